/*!
`list.rs`

Prints the endpoint registry (`siaapi -l`).

JSON Output Shape (`-l -j`):
{
  "count": 91,
  "endpoints": [
    { "path": "/consensus", "method": "GET", "aliases": [] },
    ...
  ]
}
*/

use anyhow::{Context, Result};
use std::io::Write;

use crate::api::Registry;
use crate::cmd::format::{self, Role, StyleOptions, color, method_role};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListArgs {
    pub json: bool,
}

/// Entry point for the endpoint listing.
pub fn execute_list<W: Write>(registry: &Registry<'_>, args: ListArgs, out: &mut W) -> Result<()> {
    if args.json {
        let doc = serde_json::json!({
            "count": registry.len(),
            "endpoints": registry.endpoints(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)
            .context("Failed to write endpoint listing")?;
        return Ok(());
    }

    let style = StyleOptions::detect();
    if registry.is_empty() {
        writeln!(out, "{}", color(Role::Dim, "(no endpoints)", &style))
            .context("Failed to write endpoint listing")?;
        return Ok(());
    }
    let text = render_table(registry, &style);
    writeln!(out, "{text}").context("Failed to write endpoint listing")?;
    writeln!(
        out,
        "\n{}",
        color(
            Role::Dim,
            "Usage: siaapi <segment>... [--method M] [--key value]...",
            &style
        )
    )
    .context("Failed to write endpoint listing")?;
    Ok(())
}

fn render_table(registry: &Registry<'_>, style: &StyleOptions) -> String {
    let rows: Vec<Vec<String>> = registry
        .endpoints()
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            let aliases = if e.aliases.is_empty() {
                "-".to_string()
            } else {
                e.aliases.join(", ")
            };
            vec![
                (idx + 1).to_string(),
                color(method_role(e.method), e.method, style),
                e.path.to_string(),
                aliases,
            ]
        })
        .collect();

    format::table(&["#", "METHOD", "PATH", "ALIASES"], &rows, style)
}
