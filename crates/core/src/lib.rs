pub mod domain;
pub mod engine;
pub mod ingest;
pub mod projection;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_NAV_FEED_URL: &str = "https://www.amfiindia.com/spages/NAVAll.txt";
    pub const DEFAULT_NAV_FEED_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_ASSUMED_ANNUAL_RETURN: f64 = 0.12;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub nav_feed_url: String,
        pub nav_feed_timeout_secs: u64,
        /// Placeholder return used for every fund until a real model exists.
        pub assumed_annual_return: f64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                nav_feed_url: DEFAULT_NAV_FEED_URL.to_string(),
                nav_feed_timeout_secs: DEFAULT_NAV_FEED_TIMEOUT_SECS,
                assumed_annual_return: DEFAULT_ASSUMED_ANNUAL_RETURN,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let defaults = Self::default();

            let nav_feed_url = lookup("NAV_FEED_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.nav_feed_url);

            let nav_feed_timeout_secs = match lookup("NAV_FEED_TIMEOUT_SECS") {
                Some(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("NAV_FEED_TIMEOUT_SECS must be an integer (got {s:?})"))?,
                None => defaults.nav_feed_timeout_secs,
            };
            anyhow::ensure!(
                nav_feed_timeout_secs > 0,
                "NAV_FEED_TIMEOUT_SECS must be > 0"
            );

            let assumed_annual_return = match lookup("ASSUMED_ANNUAL_RETURN") {
                Some(s) => s
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("ASSUMED_ANNUAL_RETURN must be a number (got {s:?})"))?,
                None => defaults.assumed_annual_return,
            };
            anyhow::ensure!(
                assumed_annual_return.is_finite() && assumed_annual_return >= 0.0,
                "ASSUMED_ANNUAL_RETURN must be a finite, non-negative rate (got {assumed_annual_return})"
            );

            Ok(Self {
                nav_feed_url,
                nav_feed_timeout_secs,
                assumed_annual_return,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
            })
        }
    }

}
