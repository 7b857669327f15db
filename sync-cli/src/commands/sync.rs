//! Run one sync cycle.

use anyhow::Result;
use itemsync_core::CycleOutcome;

use super::Context;

/// Run the sync command.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.open().await?;
    let outcome = client.run_cycle_now().await;

    if let CycleOutcome::Failed(failure) = &outcome {
        anyhow::bail!("Sync failed: {}", failure);
    }

    match client.last_banner() {
        Some(banner) => println!("{}", banner.message),
        None => println!("Sync {}", outcome),
    }
    if let CycleOutcome::SyncedWithConflicts(_) = outcome {
        println!("Run 'itemsync conflicts' to review, 'itemsync resolve' to override.");
    }
    Ok(())
}
