use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Paste {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_in: Option<i64>,
    pub views: Option<i64>,
}

/// Row shape returned by the listing and search scans.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PasteSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Paste {
    /// The instant the paste expires, if it expires at all.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .map(|minutes| self.created_at + Duration::minutes(minutes))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(false, |at| now > at)
    }

    /// View count, with an unset counter reading as zero.
    pub fn views(&self) -> i64 {
        self.views.unwrap_or(0)
    }
}
