// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed tool catalog.
//!
//! Layout: `{root}/{category}/{slug}.json` for default content and
//! `{root}/{category}/{locale}/{slug}.json` for localized overrides.
//! Lookup order for `(category, slug, locale)`:
//! 1. localized file named `{slug}.json`
//! 2. localized file whose `id` equals `slug`
//! 3. default file named `{slug}.json`
//! 4. default file whose `id` equals `slug`

use std::path::{Path, PathBuf};

use dreamshot_config::model::ContentConfig;
use dreamshot_core::{DreamshotError, ToolRef};
use tracing::{debug, warn};

use crate::model::{LoadedTool, ToolConfig};

/// Read-only view over the tool content directory.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    root: PathBuf,
}

impl ToolCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(&config.tools_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one tool, falling back from localized to default content and from
    /// filename match to `id` match.
    pub fn load(
        &self,
        category: &str,
        slug: &str,
        locale: Option<&str>,
    ) -> Result<LoadedTool, DreamshotError> {
        check_segment("category", category)?;
        check_segment("slug", slug)?;
        if let Some(locale) = locale {
            check_segment("locale", locale)?;
        }

        let category_dir = self.root.join(category);
        let mut search: Vec<(Option<&str>, PathBuf)> = Vec::with_capacity(2);
        if let Some(locale) = locale {
            search.push((Some(locale), category_dir.join(locale)));
        }
        search.push((None, category_dir));

        for (used_locale, dir) in search {
            if let Some(config) = find_in_dir(&dir, slug)? {
                debug!(category, slug, locale = ?used_locale, "tool config resolved");
                return Ok(LoadedTool {
                    tool_ref: ToolRef {
                        category: category.to_string(),
                        slug: slug.to_string(),
                    },
                    locale: used_locale.map(String::from),
                    config,
                });
            }
        }

        Err(DreamshotError::NotFound {
            kind: "tool".into(),
            key: format!("{category}/{slug}"),
        })
    }

    /// All tools of a category, localized where a localized file exists.
    ///
    /// Sorted by id. Unparseable files are skipped with a warning.
    pub fn list(
        &self,
        category: &str,
        locale: Option<&str>,
    ) -> Result<Vec<ToolConfig>, DreamshotError> {
        check_segment("category", category)?;
        let category_dir = self.root.join(category);
        if !category_dir.is_dir() {
            return Err(DreamshotError::NotFound {
                kind: "category".into(),
                key: category.to_string(),
            });
        }

        let mut tools = read_dir_configs(&category_dir)?;
        if let Some(locale) = locale {
            check_segment("locale", locale)?;
            let localized_dir = category_dir.join(locale);
            if localized_dir.is_dir() {
                for localized in read_dir_configs(&localized_dir)? {
                    match tools.iter_mut().find(|t| t.id == localized.id) {
                        Some(existing) => *existing = localized,
                        None => tools.push(localized),
                    }
                }
            }
        }

        tools.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tools)
    }

    /// Resolve a tool's recommended effects within its category.
    ///
    /// Ids that do not resolve are dropped.
    pub fn recommended(
        &self,
        tool: &LoadedTool,
        locale: Option<&str>,
    ) -> Vec<LoadedTool> {
        let Some(ids) = tool.config.recommended_effects.as_ref() else {
            return Vec::new();
        };

        ids.iter()
            .filter(|id| **id != tool.config.id)
            .filter_map(|id| match self.load(&tool.tool_ref.category, id, locale) {
                Ok(found) => Some(found),
                Err(e) => {
                    warn!(id = %id, error = %e, "recommended effect not found");
                    None
                }
            })
            .collect()
    }
}

/// Reject empty segments and anything that could escape the content root.
fn check_segment(what: &str, value: &str) -> Result<(), DreamshotError> {
    let ok = !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\'])
        && !value.contains('\0');
    if ok {
        Ok(())
    } else {
        Err(DreamshotError::Validation(format!("invalid {what}: `{value}`")))
    }
}

fn find_in_dir(dir: &Path, slug: &str) -> Result<Option<ToolConfig>, DreamshotError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let exact = dir.join(format!("{slug}.json"));
    if exact.is_file() {
        return parse_file(&exact).map(Some);
    }

    debug!(dir = %dir.display(), slug, "no exact file, scanning for id");
    Ok(read_dir_configs(dir)?.into_iter().find(|c| c.id == slug))
}

fn read_dir_configs(dir: &Path) -> Result<Vec<ToolConfig>, DreamshotError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        DreamshotError::Internal(format!("failed to read {}: {e}", dir.display()))
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter_map(|path| match parse_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable tool file");
                None
            }
        })
        .collect())
}

fn parse_file(path: &Path) -> Result<ToolConfig, DreamshotError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DreamshotError::Internal(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| DreamshotError::Config(format!("invalid tool file {}: {e}", path.display())))
}
