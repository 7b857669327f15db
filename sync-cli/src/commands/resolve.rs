//! Resolve pending conflicts.

use anyhow::{anyhow, Context as _, Result};
use itemsync_types::{Choice, ItemId};
use std::collections::HashMap;

use super::Context;

/// Run the resolve command.
pub async fn run(ctx: &Context, keep: &[String]) -> Result<()> {
    let choices = parse_choices(keep)?;
    let client = ctx.open().await?;

    if client.pending_conflicts().await.is_empty() {
        println!("No conflicts to resolve.");
        return Ok(());
    }

    let report = client.apply_resolutions(&choices).await?;
    if !report.cleared {
        for id in &report.ignored {
            println!("  ignored unknown conflict {}", id);
        }
        println!("No choice matched a pending conflict; conflicts kept.");
        return Ok(());
    }
    println!("Applied {} resolution(s)", report.applied.len());
    for id in &report.applied {
        println!("  restored choice for {}", id);
    }
    for id in &report.ignored {
        println!("  ignored unknown conflict {}", id);
    }
    Ok(())
}

/// Parse `id=local|remote` arguments.
fn parse_choices(keep: &[String]) -> Result<HashMap<ItemId, Choice>> {
    keep.iter()
        .map(|arg| {
            let (id, choice) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("expected <id>=local|remote, got '{}'", arg))?;
            let id: ItemId = id.parse().with_context(|| format!("invalid id in '{}'", arg))?;
            let choice: Choice = choice
                .parse()
                .with_context(|| format!("invalid choice in '{}'", arg))?;
            Ok((id, choice))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_context;

    #[test]
    fn parse_choices_accepts_both_sides() {
        let choices =
            parse_choices(&["a=local".to_string(), "b=remote".to_string()]).unwrap();
        assert_eq!(choices[&ItemId::new("a").unwrap()], Choice::Local);
        assert_eq!(choices[&ItemId::new("b").unwrap()], Choice::Remote);
    }

    #[test]
    fn parse_choices_rejects_bad_input() {
        assert!(parse_choices(&["a".to_string()]).is_err());
        assert!(parse_choices(&["a=mine".to_string()]).is_err());
        assert!(parse_choices(&["=local".to_string()]).is_err());
    }

    #[tokio::test]
    async fn resolve_without_pending_is_noop() {
        let (_dir, ctx) = mock_context();
        assert!(run(&ctx, &["z=local".to_string()]).await.is_ok());
    }
}
