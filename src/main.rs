mod api_types;
mod config;
mod error;
mod extract;
mod fetch;
mod generate;
mod history;
mod index;
mod llm;
mod models;
mod notify;
mod orchestrator;
mod out_models;
mod persona;
mod prompts;
mod radar;
mod render;
mod sample;
mod volume;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use config::Settings;
use fetch::FeedQuery;
use render::SiteKeys;

/// AI News Cross-Review "The Jury" - six personas, one story, one article per run
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generative API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Generative API base URL
    #[arg(long, env = "JURY_API_BASE", default_value = llm::DEFAULT_API_BASE)]
    api_base: String,

    /// Model used for all three generation calls
    #[arg(long, env = "JURY_MODEL", default_value = llm::DEFAULT_MODEL)]
    model: String,

    /// Incoming webhook for the publish notification (skipped when unset)
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    slack_webhook: Option<String>,

    /// Auxiliary data endpoint substituted into the article page
    #[arg(long, env = "SUPABASE_URL", default_value = "")]
    supabase_url: String,

    /// Public (anon) key for the auxiliary data endpoint
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true, default_value = "")]
    supabase_anon_key: String,

    /// News feed search query (defaults to recent generative-AI news)
    #[arg(long, env = "JURY_FEED_QUERY")]
    feed_query: Option<String>,

    /// Directory holding template.html, index.html, used_titles.json and articles
    #[arg(short, long, env = "JURY_SITE_DIR", default_value = ".")]
    site_dir: PathBuf,

    /// Public URL the site is served from, used for the notification link
    #[arg(long, env = "JURY_PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Fail instead of defaulting when a persona is missing from the reviews
    #[arg(long)]
    strict_panel: bool,

    /// Render the hand-written Vol.001 launch issue and exit (no API key needed)
    #[arg(long)]
    sample: bool,
}

impl Args {
    fn into_settings(self) -> Settings {
        let mut feed = FeedQuery::default();
        if let Some(q) = self.feed_query.filter(|q| !q.trim().is_empty()) {
            feed.query = q;
        }
        Settings {
            api_key: self.api_key,
            api_base: self.api_base,
            model: self.model,
            webhook_url: self.slack_webhook,
            public_base_url: self.public_base_url,
            feed,
            site_dir: self.site_dir,
            keys: SiteKeys {
                supabase_url: self.supabase_url,
                supabase_anon_key: self.supabase_anon_key,
            },
            strict_panel: self.strict_panel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting the-jury");
    if let Some(path) = dotenv {
        debug!("Loaded environment file - path={}", path.display());
    }

    let args = Args::parse();
    if args.sample {
        let path = orchestrator::publish_sample(&args.into_settings())?;
        info!("Sample issue written - path={}", path.display());
        return Ok(());
    }

    let settings = args.into_settings().validate()?;
    debug!(
        "Settings resolved - model={}, site_dir={}, webhook={}, strict_panel={}",
        settings.model,
        settings.site_dir.display(),
        settings.webhook_url.is_some(),
        settings.strict_panel
    );

    orchestrator::run(&settings).await
}
