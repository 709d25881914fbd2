use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::history::write_atomic;
use crate::models::ArticleIndexEntry;
use crate::render::escape_html;

pub const LIST_CONTAINER: &str = r#"<div class="articles">"#;
pub const LATEST_BADGE: &str = r#"<span class="badge-latest">NEW</span>"#;

pub fn render_entry_card(entry: &ArticleIndexEntry) -> String {
    format!(
        r#"    <article class="article-card">
      <a href="{href}">
        <div class="card-vol">{vol} {badge}</div>
        <h2 class="card-title">{title}</h2>
        <p class="card-summary">{blurb}</p>
        <div class="card-meta">
          <span class="card-date">{date}</span>
          <span class="card-score">総合 {score:.1}/10</span>
        </div>
      </a>
    </article>"#,
        href = entry.volume.file_name(),
        vol = entry.volume.label(),
        badge = LATEST_BADGE,
        title = escape_html(&entry.title),
        blurb = escape_html(&entry.short_blurb),
        date = entry.date,
        score = entry.total_score,
    )
}

/// Demotes the previous "latest" card and puts `entry` at the top of the list.
pub fn insert_entry(document: &str, entry: &ArticleIndexEntry) -> Result<String> {
    let demoted = document.matches(LATEST_BADGE).count();
    if demoted > 0 {
        debug!("Demoting previous latest entries - count={}", demoted);
    }
    let stripped = document
        .replace(&format!(" {LATEST_BADGE}"), "")
        .replace(LATEST_BADGE, "");

    let Some(at) = stripped.find(LIST_CONTAINER) else {
        bail!("index document has no {} container", LIST_CONTAINER);
    };
    let (head, tail) = stripped.split_at(at + LIST_CONTAINER.len());
    Ok(format!("{head}\n{}{tail}", render_entry_card(entry)))
}

pub fn new_index_document(entry: &ArticleIndexEntry) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>AI News Cross-Review "The Jury"</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{ background: #0d1117; color: #e6edf3; font-family: 'Noto Sans JP', sans-serif; padding: 40px 20px; }}
    .header {{ text-align: center; margin-bottom: 60px; }}
    .header h1 {{ font-size: 2rem; color: #ff4d4d; letter-spacing: 2px; }}
    .header p {{ color: #8b949e; margin-top: 10px; }}
    .articles {{ max-width: 900px; margin: 0 auto; display: grid; gap: 20px; }}
    .article-card {{ background: #161b22; border: 1px solid #30363d; border-radius: 12px; overflow: hidden; transition: transform 0.2s; }}
    .article-card:hover {{ transform: translateY(-4px); }}
    .article-card a {{ display: block; padding: 24px; text-decoration: none; color: inherit; }}
    .card-vol {{ font-size: 12px; color: #ff4d4d; font-weight: 700; margin-bottom: 8px; }}
    .badge-latest {{ background: #ff4d4d; color: #fff; border-radius: 4px; padding: 1px 6px; margin-left: 6px; font-size: 10px; }}
    .card-title {{ font-size: 1.2rem; font-weight: 700; margin-bottom: 10px; color: #e6edf3; }}
    .card-summary {{ font-size: 14px; color: #8b949e; margin-bottom: 16px; line-height: 1.6; }}
    .card-meta {{ display: flex; justify-content: space-between; font-size: 12px; color: #8b949e; }}
    .card-score {{ color: #ffd166; font-weight: 700; }}
  </style>
</head>
<body>
  <div class="header">
    <h1>AI NEWS CROSS-REVIEW "THE JURY"</h1>
    <p>6名のAIキャラクターが最新AIニュースを辛口クロスレビュー</p>
  </div>
  {container}
{card}
  </div>
</body>
</html>
"#,
        container = LIST_CONTAINER,
        card = render_entry_card(entry),
    )
}

pub fn update_index(path: &Path, entry: &ArticleIndexEntry) -> Result<()> {
    let document = match std::fs::read_to_string(path) {
        Ok(existing) => insert_entry(&existing, entry)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No index yet, creating one - path={}", path.display());
            new_index_document(entry)
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    write_atomic(path, document.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Index updated - volume={}, path={}", entry.volume, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Volume;

    fn entry(n: u32, title: &str) -> ArticleIndexEntry {
        ArticleIndexEntry {
            volume: Volume(n),
            title: title.into(),
            short_blurb: "blurb & more".into(),
            date: "2026年10月16日".into(),
            total_score: 6.5,
        }
    }

    #[test]
    fn newest_entry_renders_first_with_single_badge() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("index.html");

        update_index(&path, &entry(2, "二号")).unwrap();
        update_index(&path, &entry(3, "三号")).unwrap();
        update_index(&path, &entry(4, "四号")).unwrap();

        let doc = std::fs::read_to_string(&path).unwrap();
        let p4 = doc.find("vol004.html").unwrap();
        let p3 = doc.find("vol003.html").unwrap();
        let p2 = doc.find("vol002.html").unwrap();
        assert!(p4 < p3 && p3 < p2);
        assert_eq!(doc.matches(LATEST_BADGE).count(), 1);
        assert!(doc[..p3].contains(LATEST_BADGE));
        assert!(doc.contains(r#"<div class="card-vol">Vol.003</div>"#));
        assert_eq!(doc.matches(LIST_CONTAINER).count(), 1);
    }

    #[test]
    fn synthesized_index_has_styles_and_escaped_card() {
        let doc = new_index_document(&entry(2, "<script>"));
        assert!(doc.contains("<style>"));
        assert!(doc.contains(".badge-latest {"));
        assert!(doc.contains("&lt;script&gt;"));
        assert!(doc.contains("blurb &amp; more"));
        assert!(doc.contains("総合 6.5/10"));
    }

    #[test]
    fn hand_written_index_keeps_older_entries() {
        let existing = "<body>\n  <div class=\"articles\">\n    <article class=\"article-card\"><a href=\"vol001.html\">sample</a></article>\n  </div>\n</body>";
        let doc = insert_entry(existing, &entry(2, "二号")).unwrap();
        assert!(doc.find("vol002.html").unwrap() < doc.find("vol001.html").unwrap());
        assert!(doc.contains("sample"));
    }

    #[test]
    fn index_without_container_is_rejected() {
        assert!(insert_entry("<html><body></body></html>", &entry(2, "x")).is_err());
    }
}
