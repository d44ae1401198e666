use crate::config::Settings;
use crate::domain::fund::FundUniverse;
use crate::ingest::error::FetchFailure;
use crate::ingest::parser::parse_nav_feed;
use anyhow::Context;
use std::time::Duration;

#[async_trait::async_trait]
pub trait NavSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// One retrieval of the raw feed text. No retries.
    async fn fetch_raw(&self) -> Result<String, FetchFailure>;
}

#[derive(Debug, Clone)]
pub struct HttpNavSource {
    http: reqwest::Client,
    url: String,
}

impl HttpNavSource {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            settings.nav_feed_url.clone(),
            Duration::from_secs(settings.nav_feed_timeout_secs),
        )
    }

    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build NAV feed http client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl NavSource for HttpNavSource {
    fn source_name(&self) -> &'static str {
        "amfi_http"
    }

    async fn fetch_raw(&self) -> Result<String, FetchFailure> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchFailure::new(self.source_name(), "request", transport_detail(&e)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchFailure::new(
                self.source_name(),
                "status",
                format!("HTTP {status} from {}", self.url),
            ));
        }

        res.text()
            .await
            .map_err(|e| FetchFailure::new(self.source_name(), "body", transport_detail(&e)))
    }
}

fn transport_detail(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    }
}

/// Fetches and parses the feed into a [`FundUniverse`].
pub async fn load_universe(source: &dyn NavSource) -> Result<FundUniverse, FetchFailure> {
    let raw = source.fetch_raw().await?;
    let fetched_at = chrono::Utc::now();
    let parsed = parse_nav_feed(&raw);

    tracing::info!(
        source = source.source_name(),
        loaded = parsed.records.len(),
        skipped = parsed.skipped_lines,
        "loaded NAV feed"
    );

    Ok(FundUniverse {
        records: parsed.records,
        skipped_lines: parsed.skipped_lines,
        fetched_at,
    })
}
