use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::NewsCandidate;

pub const MAX_CANDIDATES: usize = 20;
const FEED_TIMEOUT: Duration = Duration::from_secs(15);
const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where to look for candidate stories.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    pub endpoint: String,
    pub query: String,
    pub language: String,
    pub region: String,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            endpoint: "https://news.google.com/rss/search".to_string(),
            query: "生成AI OR LLM when:7d".to_string(),
            language: "ja".to_string(),
            region: "JP".to_string(),
        }
    }
}

impl FeedQuery {
    pub fn url(&self) -> Result<Url> {
        let ceid = format!("{}:{}", self.region, self.language);
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", self.query.as_str()),
                ("hl", self.language.as_str()),
                ("gl", self.region.as_str()),
                ("ceid", ceid.as_str()),
            ],
        )
        .with_context(|| format!("invalid feed endpoint {}", self.endpoint))
    }
}

/// Never fails: any transport or parse problem yields an empty list so the
/// selection stage can fall back to asking the model directly.
pub async fn fetch_candidates(client: &Client, query: &FeedQuery) -> Vec<NewsCandidate> {
    let start = std::time::Instant::now();
    match try_fetch(client, query).await {
        Ok(items) => {
            info!(
                "Feed fetch completed - duration={:.2}s, candidates={}",
                start.elapsed().as_secs_f32(),
                items.len()
            );
            items
        }
        Err(e) => {
            warn!("Feed unavailable, falling back to direct generation - error={:#}", e);
            Vec::new()
        }
    }
}

async fn try_fetch(client: &Client, query: &FeedQuery) -> Result<Vec<NewsCandidate>> {
    let url = query.url()?;
    debug!("Fetching feed - url={}", url);

    let resp = client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .timeout(FEED_TIMEOUT)
        .send()
        .await
        .with_context(|| format!("Request failed for {}", url))?
        .error_for_status()
        .with_context(|| format!("HTTP error for {}", url))?;

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("Reading body of {}", url))?;
    parse_feed(&bytes)
}

/// Parses an RSS document into at most [`MAX_CANDIDATES`] candidates, in feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<NewsCandidate>> {
    let channel = rss::Channel::read_from(bytes).context("Decoding RSS feed")?;

    let candidates = channel
        .items()
        .iter()
        .filter_map(|item| {
            let source = item.source();
            let source_name = source
                .and_then(|s| s.title())
                .map(str::trim)
                .unwrap_or_default()
                .to_string();
            let title = normalize_title(item.title()?, &source_name);
            if title.is_empty() {
                return None;
            }
            Some(NewsCandidate {
                title,
                link: item.link()?.trim().to_string(),
                published_at: item.pub_date().and_then(parse_pub_date),
                source_url: source.map(|s| s.url().to_string()).unwrap_or_default(),
                source_name,
            })
        })
        .take(MAX_CANDIDATES)
        .collect::<Vec<_>>();

    debug!(
        "Feed parsed - items={}, candidates={}",
        channel.items().len(),
        candidates.len()
    );
    Ok(candidates)
}

/// Aggregator titles carry a " - Publisher" suffix; drop it when it matches the source.
fn normalize_title(raw: &str, source_name: &str) -> String {
    let title = raw.trim();
    if !source_name.is_empty() {
        if let Some(stripped) = title.strip_suffix(source_name) {
            if let Some(stripped) = stripped.trim_end().strip_suffix('-') {
                return stripped.trim_end().to_string();
            }
        }
    }
    title.to_string()
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>AI - Google News</title><link>https://news.google.com</link><description>feed</description>
<item>
  <title>OpenAIが新モデルを発表 - ITmedia</title>
  <link>https://news.example/a</link>
  <pubDate>Mon, 12 Oct 2026 09:30:00 GMT</pubDate>
  <source url="https://www.itmedia.co.jp">ITmedia</source>
</item>
<item>
  <title>AI規制法案、国会で審議入り</title>
  <link>https://news.example/b</link>
  <pubDate>not a date</pubDate>
</item>
<item>
  <title>   </title>
  <link>https://news.example/c</link>
</item>
<item>
  <title>リンクなし</title>
</item>
</channel></rss>"#;

    #[test]
    fn parses_items_with_sources_and_dates() {
        let items = parse_feed(FEED.as_bytes()).expect("parse");
        assert_eq!(items.len(), 2);

        assert_eq!(
            items[0],
            NewsCandidate {
                title: "OpenAIが新モデルを発表".into(),
                link: "https://news.example/a".into(),
                published_at: Some(Utc.with_ymd_and_hms(2026, 10, 12, 9, 30, 0).unwrap()),
                source_name: "ITmedia".into(),
                source_url: "https://www.itmedia.co.jp".into(),
            }
        );
        assert_eq!(items[1].title, "AI規制法案、国会で審議入り");
        assert_eq!(items[1].published_at, None);
        assert_eq!(items[1].source_name, "");
    }

    #[test]
    fn caps_candidate_count() {
        let items: String = (0..30)
            .map(|i| format!("<item><title>t{i}</title><link>https://x/{i}</link></item>"))
            .collect();
        let feed = format!(
            "<rss version=\"2.0\"><channel><title>x</title><link>https://x</link><description>x</description>{items}</channel></rss>"
        );
        let parsed = parse_feed(feed.as_bytes()).unwrap();
        assert_eq!(parsed.len(), MAX_CANDIDATES);
        assert_eq!(parsed[0].title, "t0");
    }

    #[tokio::test]
    async fn unreachable_feed_degrades_to_no_candidates() {
        let query = FeedQuery {
            endpoint: "http://127.0.0.1:9/rss/search".into(),
            ..FeedQuery::default()
        };
        let items = fetch_candidates(&Client::new(), &query).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn invalid_feed_endpoint_degrades_to_no_candidates() {
        let query = FeedQuery {
            endpoint: "not a url".into(),
            ..FeedQuery::default()
        };
        assert!(fetch_candidates(&Client::new(), &query).await.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(parse_feed(b"<html>rate limited</html>").is_err());
    }

    #[test]
    fn title_suffix_only_stripped_for_matching_source() {
        assert_eq!(normalize_title("A - B - Nikkei", "Nikkei"), "A - B");
        assert_eq!(normalize_title("A - Nikkei", "ITmedia"), "A - Nikkei");
        assert_eq!(normalize_title("Nikkei", "Nikkei"), "Nikkei");
    }

    #[test]
    fn query_url_is_encoded() {
        let url = FeedQuery::default().url().unwrap();
        assert_eq!(url.host_str(), Some("news.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("ceid".into(), "JP:ja".into())));
        assert!(pairs.contains(&("q".into(), "生成AI OR LLM when:7d".into())));
    }
}
