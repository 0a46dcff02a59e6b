//! The article record served by `GET /news`.
//!
//! `NewsItem` mirrors the backend's JSON object field-for-field.  The only
//! field the client ever changes is [`NewsItem::is_favorite`], and only
//! through [`crate::app::App::toggle_favorite`].
//!
//! ## For contributors
//!
//! The backend serialises SQL rows directly, so nullable columns arrive as
//! JSON `null`.  Keep those fields as `Option`, or give plain fields
//! `#[serde(default, deserialize_with = "null_as_default")]`, so a single
//! odd row can't fail the whole fetch.  `default` alone only covers a
//! missing key.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A single article as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Backend primary key, unique within one fetch.
    pub id: u64,

    /// Headline.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Summary text, usually carrying HTML markup from the original feed.
    #[serde(default)]
    pub summary: Option<String>,

    /// Link to the full article.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Id of the feed this article was ingested from.
    #[serde(default)]
    pub source_id: Option<u64>,

    /// Display name of the feed (e.g. "TechCrunch").
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_name: String,

    /// Publication timestamp exactly as the backend sent it.
    #[serde(default)]
    pub published_at: Option<String>,

    /// Whether the user has starred this article.
    #[serde(default)]
    pub is_favorite: bool,
}

impl NewsItem {
    /// Calendar date of publication, if the timestamp parses.
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_at.as_deref().and_then(parse_timestamp).map(|t| t.date())
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2025-01-03T10:00:00+00:00`) as well as the naive ISO
/// form the backend emits for timezone-less columns
/// (`2025-01-03T10:00:00` or `2025-01-03 10:00:00.123`).  Returns `None`
/// for anything else instead of failing.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Format an optional timestamp as a short date for list rows.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no date".into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
