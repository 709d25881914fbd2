use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

use crate::models::ArticleIndexEntry;
use crate::persona::Persona;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

fn score_bar(total: f64) -> String {
    let filled = (total.max(0.0) as usize).min(10);
    format!("{}{}", "🟥".repeat(filled), "⬜".repeat(10 - filled))
}

pub fn build_payload(entry: &ArticleIndexEntry, posted_on: &str, article_url: Option<&str>) -> Value {
    let lineup = Persona::ALL
        .iter()
        .map(|p| format!("{} {}", p.emoji(), p.display_name()))
        .collect::<Vec<_>>()
        .join(" vs ");

    let mut blocks = vec![
        json!({
            "type": "header",
            "text": {
                "type": "plain_text",
                "text": format!("📰 AIニュースクロスレビュー {} 公開！", entry.volume.label()),
                "emoji": true
            }
        }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*{}*\n\n{}", entry.title, entry.short_blurb)
            }
        }),
        json!({
            "type": "section",
            "fields": [
                {
                    "type": "mrkdwn",
                    "text": format!("*総合スコア*\n{} {:.1}/10", score_bar(entry.total_score), entry.total_score)
                },
                { "type": "mrkdwn", "text": format!("*公開日*\n{}", posted_on) }
            ]
        }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("{lineup}\n6名の激論はブログで！") }
        }),
    ];

    if let Some(url) = article_url {
        blocks.push(json!({
            "type": "actions",
            "elements": [{
                "type": "button",
                "text": { "type": "plain_text", "text": "📖 記事を読む", "emoji": true },
                "url": url,
                "style": "primary"
            }]
        }));
    }

    json!({ "blocks": blocks })
}

/// Best effort: skipped without a webhook, failures only logged.
pub async fn notify(client: &Client, webhook: Option<&str>, payload: &Value) -> bool {
    let Some(webhook) = webhook.filter(|w| !w.trim().is_empty()) else {
        warn!("No webhook configured, skipping notification");
        return false;
    };

    let result = client
        .post(webhook)
        .timeout(WEBHOOK_TIMEOUT)
        .json(payload)
        .send()
        .await
        .and_then(|r| r.error_for_status());

    match result {
        Ok(resp) => {
            info!("Notification sent - status={}", resp.status());
            true
        }
        Err(e) => {
            warn!("Notification failed, article already published - error={}", e);
            false
        }
    }
}
