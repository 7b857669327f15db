//! Show a random item.

use anyhow::Result;

use super::{effective_category, Context};

/// Run the show command.
pub async fn run(ctx: &Context, category: Option<&str>) -> Result<()> {
    let client = ctx.open().await?;
    let filter = effective_category(&client, category).await?;

    match client.show_random(filter.as_deref()).await {
        Some(item) => {
            println!("\"{}\"", item.text());
            println!("  - {}", item.category());
        }
        None => println!("No items in this category."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[tokio::test]
    async fn show_from_seed_set() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx, Some("Motivation")).await.is_ok());
        assert!(run(&ctx, Some("Nope")).await.is_ok());
    }
}
