// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dreamshot tool show` and `dreamshot tool list`.

use dreamshot_config::model::DreamshotConfig;
use dreamshot_content::{LoadedTool, ToolCatalog, ToolConfig};
use dreamshot_core::DreamshotError;

fn effective_locale<'a>(config: &'a DreamshotConfig, locale: Option<&'a str>) -> Option<&'a str> {
    locale.or(config.app.default_locale.as_deref())
}

/// Print one tool as JSON, followed by the ids of its resolvable
/// recommended effects.
pub fn run_show(
    config: &DreamshotConfig,
    category: &str,
    slug: &str,
    locale: Option<&str>,
) -> Result<(), DreamshotError> {
    let catalog = ToolCatalog::from_config(&config.content);
    let locale = effective_locale(config, locale);
    let tool = catalog.load(category, slug, locale)?;

    println!("{}", to_json(&tool.config)?);
    let recommended = catalog.recommended(&tool, locale);
    if !recommended.is_empty() {
        println!("recommended: {}", recommended_ids(&recommended).join(", "));
    }
    Ok(())
}

/// Print one line per tool in `category`.
pub fn run_list(
    config: &DreamshotConfig,
    category: &str,
    locale: Option<&str>,
) -> Result<(), DreamshotError> {
    let catalog = ToolCatalog::from_config(&config.content);
    let tools = catalog.list(category, effective_locale(config, locale))?;
    if tools.is_empty() {
        println!("no tools in {category}");
    }
    for tool in &tools {
        println!("{}", summary_line(tool));
    }
    Ok(())
}

fn to_json(config: &ToolConfig) -> Result<String, DreamshotError> {
    serde_json::to_string_pretty(config)
        .map_err(|e| DreamshotError::Internal(format!("failed to serialize tool: {e}")))
}

fn recommended_ids(tools: &[LoadedTool]) -> Vec<&str> {
    tools.iter().map(|t| t.config.id.as_str()).collect()
}

fn summary_line(tool: &ToolConfig) -> String {
    format!(
        "{:<24} {:<6} {:>3} credit(s)  {}",
        tool.id, tool.input_mode, tool.credit_cost, tool.title
    )
}
