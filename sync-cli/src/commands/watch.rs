//! Poll the remote periodically.

use anyhow::Result;
use std::time::Duration;

use super::Context;

/// Run the watch command until interrupted or `cycles` cycles complete.
pub async fn run(ctx: &Context, interval_ms: Option<u64>, cycles: Option<usize>) -> Result<()> {
    let client = ctx.open().await?;
    let mut status = client.subscribe();

    let interval = match interval_ms {
        Some(ms) => {
            let interval = Duration::from_millis(ms);
            client.start_polling(interval)?;
            interval
        }
        None => {
            if !client.start_configured_polling()? {
                println!("Periodic sync is disabled ([sync] enabled = false)");
                return Ok(());
            }
            client.config().sync.interval()
        }
    };
    println!(
        "Polling every {} ms (Ctrl-C to stop)",
        interval.as_millis()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut completed = 0usize;
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                if current.is_syncing() {
                    continue;
                }
                completed += 1;
                match client.last_banner() {
                    Some(banner) => println!("[{}] {}", completed, banner.message),
                    None => println!("[{}] {}", completed, current),
                }
                if cycles.is_some_and(|n| completed >= n) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!("Stopping...");
                break;
            }
        }
    }

    client.stop_polling();
    Ok(())
}
