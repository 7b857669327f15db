//! List pending conflicts.

use anyhow::Result;

use super::Context;

/// Run the conflicts command.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.open().await?;
    let pending = client.pending_conflicts().await;

    if pending.is_empty() {
        println!("No conflicts to resolve.");
        return Ok(());
    }

    println!("{} conflict(s), server version currently kept:", pending.len());
    for conflict in &pending {
        println!();
        println!("  id: {}", conflict.id);
        println!(
            "    local:  [{}] {}",
            conflict.local.category(),
            conflict.local.text()
        );
        println!(
            "    remote: [{}] {}  (kept)",
            conflict.remote.category(),
            conflict.remote.text()
        );
    }
    println!();
    println!("Restore a local version with: itemsync resolve --keep <id>=local");
    Ok(())
}
