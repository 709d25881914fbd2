use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{SourceLink, Tag};

/* Selection */
#[derive(Debug, Clone, Deserialize)]
pub struct StoryDraft {
    /// Only present when the model picked from a candidate list.
    #[serde(default)]
    pub selected_index: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub title_html: Option<String>,
    #[serde(default)]
    pub hero_lead: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub summary_items: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub news_summary_short: String,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Optional `[[name, url], ...]` when the story has several sources.
    #[serde(default)]
    pub sources: Vec<SourceLink>,
}

/* Reviews */
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSheet {
    #[serde(default)]
    pub scores: HashMap<String, f64>,
    #[serde(default)]
    pub reviews: HashMap<String, String>,
}

/* Roundtable */
#[derive(Debug, Clone, Deserialize)]
pub struct RoundtableScript {
    pub chat_log: Vec<(String, String, String)>,
    #[serde(default)]
    pub quote: String,
}
