// src/render.rs
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use itertools::Itertools;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{Roundtable, SelectedStory, Volume};
use crate::persona::{Panel, Persona};
use crate::radar::{axis_labels, chart_datasets, PersonaRadar};

/// Every token the article template may contain.
pub const PLACEHOLDERS: &[&str] = &[
    "{{ARTICLE_TITLE}}",
    "{{ARTICLE_TITLE_HTML}}",
    "{{ARTICLE_ID}}",
    "{{VOL_NUMBER}}",
    "{{PUBLISH_DATE}}",
    "{{NEWS_SUMMARY_SHORT}}",
    "{{HERO_LEAD}}",
    "{{OVERVIEW}}",
    "{{TAGS_HTML}}",
    "{{TOTAL_SCORE}}",
    "{{SCORE_ISHIBASHI}}",
    "{{SCORE_ZERO}}",
    "{{SCORE_KOKUJI}}",
    "{{SCORE_PACKET}}",
    "{{SCORE_PURE}}",
    "{{SCORE_KITSU}}",
    "{{SCORE_ISHIBASHI_PCT}}",
    "{{SCORE_ZERO_PCT}}",
    "{{SCORE_KOKUJI_PCT}}",
    "{{SCORE_PACKET_PCT}}",
    "{{SCORE_PURE_PCT}}",
    "{{SCORE_KITSU_PCT}}",
    "{{REVIEW_ISHIBASHI}}",
    "{{REVIEW_ZERO}}",
    "{{REVIEW_KOKUJI}}",
    "{{REVIEW_PACKET}}",
    "{{REVIEW_PURE}}",
    "{{REVIEW_KITSU}}",
    "{{SUMMARY_ITEMS}}",
    "{{CHAT_LOG_HTML}}",
    "{{RADAR_DATA_JSON}}",
    "{{RADAR_LABELS_JSON}}",
    "{{QUOTE_TEXT}}",
    "{{SOURCE_LINKS}}",
    "{{SUPABASE_URL}}",
    "{{SUPABASE_ANON_KEY}}",
];

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keeps `<br>` line breaks from the model but escapes everything else.
fn escape_with_breaks(s: &str) -> String {
    escape_html(s)
        .replace("&lt;br&gt;", "<br>")
        .replace("&lt;br/&gt;", "<br>")
        .replace("&lt;br /&gt;", "<br>")
}

/// CSS class names the model proposes, reduced to `[a-z0-9_-]`.
fn css_class(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Persona icon `src` values: inline data URIs when the PNG is on disk,
/// otherwise the relative asset path.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    sources: HashMap<Persona, String>,
}

impl IconSet {
    pub fn load(icons_dir: &Path) -> Self {
        let mut sources = HashMap::new();
        for persona in Persona::ALL {
            let path = icons_dir.join(format!("{}.png", persona.id()));
            match std::fs::read(&path) {
                Ok(bytes) => {
                    debug!("Embedding icon - persona={}, bytes={}", persona.id(), bytes.len());
                    sources.insert(persona, format!("data:image/png;base64,{}", BASE64.encode(&bytes)));
                }
                Err(_) => debug!("Icon not found, linking instead - path={}", path.display()),
            }
        }
        Self { sources }
    }

    pub fn src(&self, persona: Persona) -> String {
        self.sources
            .get(&persona)
            .cloned()
            .unwrap_or_else(|| format!("assets/icons/{}.png", persona.id()))
    }
}

/// Values for the auxiliary data endpoint the page talks to client-side.
#[derive(Debug, Clone, Default)]
pub struct SiteKeys {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

pub struct ArticleContext<'a> {
    pub volume: Volume,
    pub publish_date: &'a str,
    pub story: &'a SelectedStory,
    pub panel: &'a Panel,
    pub radar: &'a [PersonaRadar],
    pub roundtable: &'a Roundtable,
    pub icons: &'a IconSet,
    pub keys: &'a SiteKeys,
}

fn score_pct(score: i32) -> i32 {
    score.saturating_mul(10).clamp(0, 100)
}

fn render_tags(story: &SelectedStory) -> String {
    story
        .tags
        .iter()
        .map(|t| format!(r#"<span class="tag {}">{}</span>"#, css_class(&t.category), escape_html(&t.label)))
        .join("\n    ")
}

fn render_summary_items(story: &SelectedStory) -> String {
    story
        .summary_items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .join("\n      ")
}

fn render_chat_log(roundtable: &Roundtable, icons: &IconSet) -> String {
    roundtable
        .entries
        .iter()
        .map(|e| {
            let name = e.persona.display_name();
            format!(
                r#"      <div class="chat-msg {id} {side}">
        <img src="{src}" alt="{name}" class="chat-icon">
        <div class="chat-bubble-wrap">
          <span class="chat-name">{name}</span>
          <div class="chat-bubble">{text}</div>
        </div>
      </div>"#,
                id = e.persona.id(),
                side = e.side.as_str(),
                src = icons.src(e.persona),
                text = escape_with_breaks(&e.utterance),
            )
        })
        .join("\n")
}

fn render_source_links(story: &SelectedStory) -> String {
    story
        .sources
        .iter()
        .map(|s| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(&s.url),
                escape_html(&s.name)
            )
        })
        .join(" / ")
}

/// Placeholder → value pairs, one per entry of [`PLACEHOLDERS`].
pub fn substitutions(ctx: &ArticleContext<'_>) -> Result<Vec<(String, String)>> {
    let story = ctx.story;
    let mut subs: Vec<(String, String)> = vec![
        ("{{ARTICLE_TITLE}}".into(), escape_html(&story.title)),
        ("{{ARTICLE_TITLE_HTML}}".into(), story.title_html.clone()),
        ("{{ARTICLE_ID}}".into(), ctx.volume.article_id()),
        ("{{VOL_NUMBER}}".into(), ctx.volume.label()),
        ("{{PUBLISH_DATE}}".into(), ctx.publish_date.to_string()),
        ("{{NEWS_SUMMARY_SHORT}}".into(), escape_html(&story.short_blurb)),
        ("{{HERO_LEAD}}".into(), story.hero_lead.clone()),
        ("{{OVERVIEW}}".into(), escape_html(&story.overview)),
        ("{{TAGS_HTML}}".into(), render_tags(story)),
        ("{{TOTAL_SCORE}}".into(), format!("{:.1}", ctx.panel.total_score())),
    ];

    for (persona, verdict) in ctx.panel.iter() {
        let key = persona.id().to_ascii_uppercase();
        subs.push((format!("{{{{SCORE_{key}}}}}"), verdict.score.to_string()));
        subs.push((format!("{{{{SCORE_{key}_PCT}}}}"), score_pct(verdict.score).to_string()));
        subs.push((format!("{{{{REVIEW_{key}}}}}"), escape_with_breaks(&verdict.review)));
    }

    subs.extend([
        ("{{SUMMARY_ITEMS}}".into(), render_summary_items(story)),
        ("{{CHAT_LOG_HTML}}".into(), render_chat_log(ctx.roundtable, ctx.icons)),
        (
            "{{RADAR_DATA_JSON}}".into(),
            serde_json::to_string(&chart_datasets(ctx.radar)).context("serializing radar datasets")?,
        ),
        (
            "{{RADAR_LABELS_JSON}}".into(),
            serde_json::to_string(&axis_labels()).context("serializing radar labels")?,
        ),
        ("{{QUOTE_TEXT}}".into(), ctx.roundtable.quote.clone()),
        ("{{SOURCE_LINKS}}".into(), render_source_links(story)),
        ("{{SUPABASE_URL}}".into(), ctx.keys.supabase_url.clone()),
        ("{{SUPABASE_ANON_KEY}}".into(), ctx.keys.supabase_anon_key.clone()),
    ]);
    Ok(subs)
}

/// Literal, all-occurrence replacement of every placeholder.
pub fn render_article(template: &str, ctx: &ArticleContext<'_>) -> Result<String> {
    let mut html = template.to_string();
    for (token, value) in substitutions(ctx)? {
        html = html.replace(&token, &value);
    }
    Ok(html)
}

pub fn write_article(site_dir: &Path, volume: Volume, html: &str) -> Result<PathBuf> {
    let path = site_dir.join(volume.file_name());
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    info!("Article written - volume={}, path={}, bytes={}", volume, path.display(), html.len());
    Ok(path)
}
