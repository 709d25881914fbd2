use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Asia::Tokyo;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::fetch::fetch_candidates;
use crate::generate::{hold_roundtable, review_story, select_story};
use crate::history::UsedTitles;
use crate::index::update_index;
use crate::llm::{GeminiClient, Generator};
use crate::models::{ArticleIndexEntry, NewsCandidate, Volume};
use crate::notify::{build_payload, notify};
use crate::radar::derive_all;
use crate::render::{render_article, write_article, ArticleContext, IconSet};
use crate::sample::{sample_panel, sample_roundtable, sample_story, SAMPLE_PUBLISH_DATE, SAMPLE_VOLUME};
use crate::volume::next_volume;

/// Publish dates as the blog prints them, in Japan time.
#[derive(Debug, Clone)]
pub struct PublishDates {
    pub long: String,
    pub short: String,
}

impl PublishDates {
    pub fn at(now: DateTime<Utc>) -> Self {
        let local = now.with_timezone(&Tokyo);
        Self {
            long: local.format("%Y年%m月%d日").to_string(),
            short: local.format("%Y/%m/%d").to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Published {
    pub path: PathBuf,
    pub entry: ArticleIndexEntry,
}

pub async fn run(settings: &Settings) -> Result<()> {
    let pipeline_start = std::time::Instant::now();
    let dates = PublishDates::at(Utc::now());
    info!("Pipeline started - date={}, site_dir={}", dates.long, settings.site_dir.display());

    let client = Client::builder().build()?;
    let generator = GeminiClient::new(client.clone(), settings.api_key.clone())
        .with_api_base(&settings.api_base)
        .with_model(&settings.model);

    // 1) candidates
    let candidates = fetch_candidates(&client, &settings.feed).await;

    // 2-8) select, review, roundtable, render, index
    let published = produce_article(&generator, candidates, settings, &dates).await?;

    // 9) notify
    let url = settings.article_url(&published.entry.volume.file_name());
    let payload = build_payload(&published.entry, &dates.short, url.as_deref());
    notify(&client, settings.webhook_url.as_deref(), &payload).await;

    info!(
        "Pipeline completed successfully - total_duration={:.2}s, volume={}, path={}",
        pipeline_start.elapsed().as_secs_f32(),
        published.entry.volume,
        published.path.display()
    );
    Ok(())
}

/// Everything between the feed and the notification. Any generation failure
/// aborts; once the article file exists, index problems are only logged.
pub async fn produce_article<G: Generator>(
    generator: &G,
    candidates: Vec<NewsCandidate>,
    settings: &Settings,
    dates: &PublishDates,
) -> Result<Published> {
    let template_path = settings.template_path();
    let template = std::fs::read_to_string(&template_path)
        .with_context(|| format!("reading template {}", template_path.display()))?;

    let volume: Volume = next_volume(&settings.site_dir)?;
    info!("Generating article - volume={}", volume);

    // 2) dedup
    let used_path = settings.used_titles_path();
    let mut used = UsedTitles::load(&used_path);
    let candidates = used.filter_unused(candidates);
    debug!("History loaded - used_titles={}, fresh_candidates={}", used.len(), candidates.len());

    // 3) selection
    let stage = std::time::Instant::now();
    let story = select_story(generator, &candidates, &used, &dates.long)
        .await
        .context("selecting story")?;
    info!("Story selected - duration={:.2}s, title={}", stage.elapsed().as_secs_f32(), story.title);
    used.push(story.title.clone());
    used.save(&used_path)?;

    // 4-5) reviews + radar
    let stage = std::time::Instant::now();
    let reviews = review_story(generator, &story, settings.strict_panel)
        .await
        .context("generating reviews")?;
    info!("Reviews completed - duration={:.2}s", stage.elapsed().as_secs_f32());

    // 6) roundtable
    let stage = std::time::Instant::now();
    let roundtable = hold_roundtable(generator, &story, &reviews.panel)
        .await
        .context("generating roundtable")?;
    info!("Roundtable completed - duration={:.2}s", stage.elapsed().as_secs_f32());

    // 7) render
    let icons = IconSet::load(&settings.icons_dir());
    let ctx = ArticleContext {
        volume,
        publish_date: &dates.long,
        story: &story,
        panel: &reviews.panel,
        radar: &reviews.radar,
        roundtable: &roundtable,
        icons: &icons,
        keys: &settings.keys,
    };
    let html = render_article(&template, &ctx)?;
    let path = write_article(&settings.site_dir, volume, &html)?;

    // 8) index
    let entry = ArticleIndexEntry {
        volume,
        title: story.title.clone(),
        short_blurb: story.short_blurb.clone(),
        date: dates.long.clone(),
        total_score: reviews.panel.total_score(),
    };
    if let Err(e) = update_index(&settings.index_path(), &entry) {
        error!("Index update failed, article is still published - error={:#}", e);
    } else {
        debug!("Index entry added - volume={}", volume);
    }

    Ok(Published { path, entry })
}

/// Renders the fixed launch issue as `vol001.html`. Leaves the index and the
/// used-titles log alone.
pub fn publish_sample(settings: &Settings) -> Result<PathBuf> {
    let template_path = settings.template_path();
    let template = std::fs::read_to_string(&template_path)
        .with_context(|| format!("reading template {}", template_path.display()))?;

    let story = sample_story();
    let panel = sample_panel();
    let radar = derive_all(&panel);
    let roundtable = sample_roundtable();
    let icons = IconSet::load(&settings.icons_dir());
    let ctx = ArticleContext {
        volume: SAMPLE_VOLUME,
        publish_date: SAMPLE_PUBLISH_DATE,
        story: &story,
        panel: &panel,
        radar: &radar,
        roundtable: &roundtable,
        icons: &icons,
        keys: &settings.keys,
    };
    let html = render_article(&template, &ctx)?;
    let path = write_article(&settings.site_dir, SAMPLE_VOLUME, &html)?;
    info!("Sample issue rendered - total_score={:.1}, path={}", panel.total_score(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;
    use crate::index::LATEST_BADGE;
    use crate::llm::testing::ScriptedGenerator;
    use crate::render::PLACEHOLDERS;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const SELECTION: &str = r#"{"selected_index":0,"title":"動画生成AIが炎上","title_html":"動画生成AIが<span class=\"highlight\">炎上</span>","hero_lead":"衝撃。<br>","overview":"概要","summary_items":["一","二","三"],"tags":[["tag-hot","衝撃"]],"news_summary_short":"短い説明"}"#;
    const REVIEWS: &str = r#"```json
{"scores":{"ishibashi":4,"zero":9,"kokuji":8,"packet":6,"pure":7,"kitsu":5},"reviews":{"ishibashi":"昔は","zero":"神","kokuji":"金","packet":"帯域","pure":"怖い","kitsu":"法"}}
```"#;
    const ROUNDTABLE: &str = r#"{"chat_log":[["ishibashi","left","反対だ"],["zero","right","賛成だ"]],"quote":"挑め。"}"#;

    fn dates() -> PublishDates {
        PublishDates::at(Utc.with_ymd_and_hms(2026, 10, 15, 16, 30, 0).unwrap())
    }

    fn candidates() -> Vec<NewsCandidate> {
        vec![NewsCandidate {
            title: "動画生成AIの新モデル".into(),
            link: "https://news.example/video".into(),
            published_at: None,
            source_name: "ITmedia".into(),
            source_url: "https://www.itmedia.co.jp".into(),
        }]
    }

    fn site() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(tmp.path().join("template.html"), include_str!("../template.html")).unwrap();
        tmp
    }

    #[test]
    fn dates_are_in_japan_time() {
        let d = dates();
        assert_eq!(d.long, "2026年10月16日");
        assert_eq!(d.short, "2026/10/16");
    }

    #[tokio::test]
    async fn end_to_end_publishes_article_index_and_history() {
        let tmp = site();
        let settings = test_settings(tmp.path());
        let generator = ScriptedGenerator::new([SELECTION, REVIEWS, ROUNDTABLE]);

        let published = produce_article(&generator, candidates(), &settings, &dates())
            .await
            .unwrap();

        assert_eq!(published.entry.volume, Volume(2));
        assert_eq!(published.entry.total_score, 6.5);
        assert!(published.path.ends_with("vol002.html"));

        let html = std::fs::read_to_string(&published.path).unwrap();
        for p in PLACEHOLDERS {
            assert!(!html.contains(p), "{p} left in article");
        }
        assert!(html.contains("動画生成AIが<span class=\"highlight\">炎上</span>"));
        assert!(html.contains("https://news.example/video"));

        let index = std::fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains("vol002.html"));
        assert_eq!(index.matches(LATEST_BADGE).count(), 1);

        let used = UsedTitles::load(&settings.used_titles_path());
        assert!(used.contains("動画生成AIが炎上"));
    }

    #[tokio::test]
    async fn used_feed_titles_route_to_fallback_prompt() {
        let tmp = site();
        let settings = test_settings(tmp.path());
        let mut used = UsedTitles::default();
        used.push("動画生成AIの新モデル");
        used.save(&settings.used_titles_path()).unwrap();
        std::fs::write(tmp.path().join("vol007.html"), "").unwrap();

        let fallback = r#"{"title":"別ネタ","source_name":"日経","source_url":"https://nikkei.example"}"#;
        let generator = ScriptedGenerator::new([fallback, REVIEWS, ROUNDTABLE]);
        let published = produce_article(&generator, candidates(), &settings, &dates())
            .await
            .unwrap();

        assert_eq!(published.entry.volume, Volume(8));
        assert!(generator.prompt(0).contains("- 動画生成AIの新モデル"));
        let html = std::fs::read_to_string(&published.path).unwrap();
        assert!(html.contains(r#"<a href="https://nikkei.example" target="_blank" rel="noopener">日経</a>"#));
    }

    #[tokio::test]
    async fn review_failure_aborts_before_writing_article() {
        let tmp = site();
        let settings = test_settings(tmp.path());
        let generator = ScriptedGenerator::new([SELECTION, "no json today"]);

        let err = produce_article(&generator, candidates(), &settings, &dates())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("generating reviews"));
        assert!(!tmp.path().join("vol002.html").exists());
        assert!(!tmp.path().join("index.html").exists());
        // selection already succeeded, so its title is recorded
        assert!(UsedTitles::load(&settings.used_titles_path()).contains("動画生成AIが炎上"));
    }

    #[tokio::test]
    async fn blank_title_is_never_recorded() {
        let tmp = site();
        let settings = test_settings(tmp.path());
        let generator = ScriptedGenerator::new([r#"{"selected_index":0,"title":""}"#]);

        let err = produce_article(&generator, candidates(), &settings, &dates())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("blank title"));
        assert!(!settings.used_titles_path().exists());
        assert!(!tmp.path().join("vol002.html").exists());
    }

    #[tokio::test]
    async fn broken_index_does_not_fail_the_run() {
        let tmp = site();
        let settings = test_settings(tmp.path());
        std::fs::write(settings.index_path(), "<html>hand edited, no list</html>").unwrap();
        let generator = ScriptedGenerator::new([SELECTION, REVIEWS, ROUNDTABLE]);

        let published = produce_article(&generator, candidates(), &settings, &dates()).await;

        assert!(published.is_ok());
        assert!(tmp.path().join("vol002.html").exists());
    }

    #[test]
    fn sample_issue_renders_as_volume_one() {
        let tmp = site();
        let settings = test_settings(tmp.path());

        let path = publish_sample(&settings).unwrap();

        assert!(path.ends_with("vol001.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        for p in PLACEHOLDERS {
            assert!(!html.contains(p), "{p} left in sample");
        }
        assert!(html.contains("Vol.001"));
        assert!(html.contains("2026年2月19日"));
        assert!(html.contains(r#"rel="noopener">TechCrunch</a> / <a href="https://www.itmedia.co.jp/aiplus/""#));
        assert!(html.contains("[10,8,2,7,9,2]"));
        assert!(!tmp.path().join("index.html").exists());
        assert_eq!(next_volume(tmp.path()).unwrap(), Volume(2));
    }

    #[tokio::test]
    async fn missing_template_fails_before_any_generation() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let settings = test_settings(tmp.path());
        let generator = ScriptedGenerator::new(Vec::<String>::new());

        assert!(produce_article(&generator, candidates(), &settings, &dates()).await.is_err());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
