use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw item from the news feed, before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsCandidate {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
    pub source_url: String,
}

/// `(css category, label)`, e.g. `("tag-hot", "衝撃")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Tag {
    pub category: String,
    pub label: String,
}

impl From<(String, String)> for Tag {
    fn from((category, label): (String, String)) -> Self {
        Self { category, label }
    }
}

impl From<Tag> for (String, String) {
    fn from(tag: Tag) -> Self {
        (tag.category, tag.label)
    }
}

/// `(publisher, url)` credited under the article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct SourceLink {
    pub name: String,
    pub url: String,
}

impl SourceLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl From<(String, String)> for SourceLink {
    fn from((name, url): (String, String)) -> Self {
        Self { name, url }
    }
}

impl From<SourceLink> for (String, String) {
    fn from(link: SourceLink) -> Self {
        (link.name, link.url)
    }
}

/// The story the jury will review. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedStory {
    pub title: String,
    pub title_html: String,
    pub hero_lead: String,
    pub overview: String,
    pub summary_items: Vec<String>,
    pub tags: Vec<Tag>,
    pub short_blurb: String,
    /// Never empty; the feed path credits exactly one.
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundtableEntry {
    pub persona: crate::persona::Persona,
    pub side: Side,
    pub utterance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roundtable {
    pub entries: Vec<RoundtableEntry>, // transcript order
    pub quote: String,
}

/// Article number. 1 is the hand-written sample issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(pub u32);

impl Volume {
    pub const FIRST_GENERATED: Volume = Volume(2);

    /// `Vol.007`
    pub fn label(self) -> String {
        format!("Vol.{:03}", self.0)
    }

    /// `vol007`
    pub fn article_id(self) -> String {
        format!("vol{:03}", self.0)
    }

    pub fn file_name(self) -> String {
        format!("{}.html", self.article_id())
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleIndexEntry {
    pub volume: Volume,
    pub title: String,
    pub short_blurb: String,
    pub date: String,
    pub total_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_deserialize_from_pairs() {
        let tags: Vec<Tag> =
            serde_json::from_str(r#"[["tag-hot","衝撃"],["tag-biz","市場"]]"#).unwrap();
        assert_eq!(tags[0].category, "tag-hot");
        assert_eq!(tags[1].label, "市場");
    }

    #[test]
    fn sources_deserialize_from_pairs() {
        let sources: Vec<SourceLink> =
            serde_json::from_str(r#"[["TechCrunch","https://techcrunch.com/"]]"#).unwrap();
        assert_eq!(sources, vec![SourceLink::new("TechCrunch", "https://techcrunch.com/")]);
    }

    #[test]
    fn volume_labels_are_zero_padded() {
        let v = Volume(7);
        assert_eq!(v.label(), "Vol.007");
        assert_eq!(v.article_id(), "vol007");
        assert_eq!(v.file_name(), "vol007.html");
        assert_eq!(Volume(1234).label(), "Vol.1234");
    }

    #[test]
    fn side_parsing_is_lenient_about_case() {
        assert_eq!(Side::parse(" Left "), Some(Side::Left));
        assert_eq!(Side::parse("right"), Some(Side::Right));
        assert_eq!(Side::parse("center"), None);
    }
}
