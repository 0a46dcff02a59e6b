//! Trending topic clusters served by `GET /topics`.

use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

/// Placeholder URL the backend sends for a cluster without articles.
pub const NO_URL: &str = "#";

/// A backend-computed group of articles covering the same story.
///
/// Topics arrive pre-sorted by descending [`popularity_score`](Self::popularity_score);
/// the client never re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub popularity_score: f64,
    /// Link to the cluster's lead article, or [`NO_URL`].
    #[serde(default = "no_url", deserialize_with = "null_as_no_url")]
    pub url: String,
    /// Older backends omit this field entirely.
    #[serde(default)]
    pub articles: Vec<TopicArticle>,
}

/// One article inside a [`Topic`].  Owned by exactly one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicArticle {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub source_id: Option<u64>,
    #[serde(default)]
    pub published_at: Option<String>,
}

fn no_url() -> String {
    NO_URL.to_string()
}

fn null_as_no_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(no_url))
}

impl Topic {
    /// The URL worth opening or sharing, if the cluster has one.
    pub fn link(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty() && url != NO_URL).then_some(url)
    }
}
