//! Backend abstraction layer.
//!
//! This module defines the [`NewsBackend`] trait and the record types the
//! backend serves ([`NewsItem`], [`Topic`], [`TopicArticle`]).  The real
//! HTTP implementation lives in [`http`].
//!
//! ## For contributors — adding an endpoint
//!
//! 1. Add an async method to [`NewsBackend`].
//! 2. Implement it on [`ApiClient`] in `http.rs` (and on the in-memory
//!    backend used by the `sync` tests).
//! 3. Add a [`crate::sync::SyncMsg`] variant for its outcome and a spawn
//!    method on [`crate::sync::Syncer`].
//!
//! The UI never calls the backend directly; it only sees `SyncMsg`s.

mod http;
mod news_item;
mod topic;

// Re-export the public API of this module so callers can write
// `use crate::source::{NewsBackend, NewsItem, Topic};`
pub use http::ApiClient;
pub use news_item::{format_date, NewsItem};
pub use topic::{Topic, TopicArticle, NO_URL};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::share::SharePlatform;

/// Deserialize a JSON `null` the same way as a missing key.
///
/// Pair with `#[serde(default)]`: serde's `default` only covers absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of a server-side feed ingest (`POST /fetch-news`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Articles the backend stored that it had not seen before.
    pub new_items: u64,
}

/// Everything the dashboard needs from the news backend.
///
/// Calls are made from spawned tokio tasks, so implementations must be
/// [`Send`] + [`Sync`].
#[async_trait]
pub trait NewsBackend: Send + Sync {
    /// Human-readable label for logs and the status bar.
    fn name(&self) -> &str;

    /// Fetch the full news collection.
    async fn fetch_news(&self) -> Result<Vec<NewsItem>>;

    /// Fetch the full topic collection, most popular first.
    async fn fetch_topics(&self) -> Result<Vec<Topic>>;

    /// Flip the server-side favorite flag for `id`.
    ///
    /// Returns the flag the server ended up with, when it reports one.
    async fn toggle_favorite(&self, id: u64) -> Result<Option<bool>>;

    /// Record a share on the server instead of (or besides) opening a link.
    async fn broadcast(&self, news_id: u64, platform: SharePlatform) -> Result<()>;

    /// Ask the server to pull its feeds and re-cluster.
    async fn trigger_ingest(&self) -> Result<IngestReport>;
}
