//! Remember a category filter.

use anyhow::Result;
use itemsync_core::ALL_CATEGORIES;

use super::Context;

/// Run the select command.
pub async fn run(ctx: &Context, category: &str) -> Result<()> {
    let client = ctx.open().await?;
    let category = category.trim();

    if category.is_empty() || category == ALL_CATEGORIES {
        client.select_category(None).await?;
        println!("Showing all categories");
        return Ok(());
    }

    if !client.categories().await.contains(category) {
        println!("Note: no items in '{}' yet", category);
    }
    client.select_category(Some(category)).await?;
    println!("Selected category: {}", category);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[tokio::test]
    async fn select_is_remembered() {
        let (_dir, ctx) = mock_context();
        run(&ctx, "Inspiration").await.unwrap();

        let client = ctx.open().await.unwrap();
        assert_eq!(
            client.selected_category().await.unwrap().as_deref(),
            Some("Inspiration")
        );
    }

    #[tokio::test]
    async fn select_all_clears_filter() {
        let (_dir, ctx) = mock_context();
        run(&ctx, "Inspiration").await.unwrap();
        run(&ctx, "all").await.unwrap();

        let client = ctx.open().await.unwrap();
        assert_eq!(client.selected_category().await.unwrap(), None);
    }
}
