//! List categories in use.

use anyhow::Result;
use itemsync_core::ALL_CATEGORIES;

use super::Context;

/// Run the categories command.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.open().await?;
    let selected = client
        .selected_category()
        .await?
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let marker = |name: &str| if name == selected { "*" } else { " " };
    println!("{} {}", marker(ALL_CATEGORIES), ALL_CATEGORIES);
    for category in client.categories().await {
        println!("{} {}", marker(&category), category);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[tokio::test]
    async fn categories_of_seed_set() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx).await.is_ok());
    }
}
