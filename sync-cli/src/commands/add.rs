//! Create an item.

use anyhow::Result;

use super::Context;

/// Run the add command.
pub async fn run(ctx: &Context, text: &str, category: &str) -> Result<()> {
    let client = ctx.open().await?;
    let added = client.add_item(text, category).await?;

    println!("Added [{}] {}", added.item.category(), added.item.text());
    println!("  id: {}", added.item.id());

    if let Some(e) = &added.persist_error {
        println!("  WARNING: not saved to disk: {}", e);
    }
    if added.pushed {
        println!("  Pushed to remote");
    } else {
        println!("  Remote unavailable; the next sync will reconcile it");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[tokio::test]
    async fn add_persists_item() {
        let (_dir, ctx) = mock_context();
        run(&ctx, "Ship it", "Craft").await.unwrap();

        let client = ctx.open().await.unwrap();
        let items = client.items_in(Some("Craft")).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text(), "Ship it");
    }

    #[tokio::test]
    async fn add_rejects_blank_category() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx, "text", "  ").await.is_err());
    }
}
