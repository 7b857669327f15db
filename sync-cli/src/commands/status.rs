//! Show collection and sync status.

use anyhow::Result;
use itemsync_core::ALL_CATEGORIES;

use super::Context;

/// Run the status command.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.open().await?;
    let config = client.config();

    println!("=== itemsync status ===");
    println!();

    println!("Collection:");
    println!("  Data dir:   {}", ctx.data_dir().display());
    println!("  Backend:    {:?}", config.storage.backend);
    println!("  Items:      {}", client.items().await.len());
    println!("  Categories: {}", client.categories().await.len());
    println!(
        "  Selected:   {}",
        client
            .selected_category()
            .await?
            .unwrap_or_else(|| ALL_CATEGORIES.to_string())
    );
    println!();

    println!("Remote:");
    if ctx.is_mock() {
        println!("  Endpoint: mock (canned snapshot)");
    } else {
        println!("  Endpoint: {}", config.remote.url);
    }
    if config.sync.enabled {
        println!("  Polling:  every {} ms", config.sync.interval_ms);
    } else {
        println!("  Polling:  disabled");
    }
    println!();

    let pending = client.pending_conflicts().await.len();
    println!("Conflicts:");
    if pending == 0 {
        println!("  None pending");
    } else {
        println!("  {} pending (run 'itemsync conflicts')", pending);
    }
    Ok(())
}
