// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool descriptor as stored in the content JSON files.

use dreamshot_core::ToolRef;
use serde::{Deserialize, Serialize};
use strum::Display;

/// How many images a tool takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputMode {
    #[default]
    Single,
    Dual,
}

impl InputMode {
    /// Number of upload slots the playground shows.
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
        }
    }
}

/// Static descriptor for one effect/tool page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Internal id. Usually equals the file slug but is not required to.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Credits charged per generation.
    #[serde(default = "default_credit_cost")]
    pub credit_cost: u32,
    #[serde(default)]
    pub input_mode: InputMode,
    #[serde(default)]
    pub preview_image: Option<String>,
    #[serde(default)]
    pub result_image: Option<String>,
    #[serde(default)]
    pub sample_images: Vec<String>,
    #[serde(default)]
    pub how_it_works: Option<Vec<HowItWorksStep>>,
    #[serde(default)]
    pub examples: Option<Vec<ToolExample>>,
    #[serde(default)]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default)]
    pub faqs: Option<Vec<Faq>>,
    /// Ids of other tools in the same category to cross-promote.
    #[serde(default)]
    pub recommended_effects: Option<Vec<String>>,
}

fn default_credit_cost() -> u32 {
    1
}

impl ToolConfig {
    pub fn is_dual(&self) -> bool {
        self.input_mode == InputMode::Dual
    }
}

/// A tool loaded from disk together with the coordinates it was requested by.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTool {
    pub tool_ref: ToolRef,
    /// Locale whose file was actually used; `None` for default content.
    pub locale: Option<String>,
    pub config: ToolConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HowItWorksStep {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolExample {
    #[serde(default)]
    pub before: Option<String>,
    pub after: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub name: String,
    pub quote: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}
