//! List items.

use anyhow::Result;

use super::{effective_category, Context};

/// Run the list command.
pub async fn run(ctx: &Context, category: Option<&str>) -> Result<()> {
    let client = ctx.open().await?;
    let filter = effective_category(&client, category).await?;
    let items = client.items_in(filter.as_deref()).await;

    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }

    for item in &items {
        println!("[{}] {}", item.category(), item.text());
        println!("    id: {}", item.id());
    }
    println!();
    println!("{} item(s)", items.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[tokio::test]
    async fn list_seeded_collection() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx, None).await.is_ok());
    }

    #[tokio::test]
    async fn list_unknown_category() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx, Some("Nope")).await.is_ok());
    }
}
