use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One scheme line from the NAV feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub code: String,
    pub name: String,
    /// Net asset value per unit. Always finite and non-negative.
    pub price: f64,
    pub nav_date: Option<NaiveDate>,
}

/// Result of a successful fetch + parse.
///
/// An empty `records` here means the feed was reachable but carried nothing usable,
/// which is different from a failed fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FundUniverse {
    pub records: Vec<FundRecord>,
    pub skipped_lines: usize,
    pub fetched_at: DateTime<Utc>,
}

impl FundUniverse {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
