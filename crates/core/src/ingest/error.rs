use std::fmt;

/// The feed could not be retrieved: transport error, timeout or non-success status.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub source: &'static str,
    pub stage: &'static str,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(source: &'static str, stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            source,
            stage,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NAV feed fetch failed (source={}, stage={}): {}",
            self.source, self.stage, self.detail
        )
    }
}

impl std::error::Error for FetchFailure {}
