//! Background backend calls.
//!
//! Every request runs as its own task on the tokio runtime and reports its
//! outcome to the UI thread over an unbounded [`mpsc`] channel.  The UI
//! drains the channel once per tick, so all state changes still happen on
//! one thread.
//!
//! ## For contributors
//!
//! Requests are fire-and-forget: nothing is awaited, coalesced, retried or
//! cancelled.  Two refreshes in quick succession simply produce four
//! messages, and whichever arrives last wins.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::share::SharePlatform;
use crate::source::{IngestReport, NewsBackend, NewsItem, Topic};

/// Messages sent from sync tasks to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMsg {
    /// Outcome of `GET /news`.
    News(Result<Vec<NewsItem>, String>),
    /// Outcome of `GET /topics`.
    Topics(Result<Vec<Topic>, String>),
    /// Outcome of one favorite persistence request.
    Favorite {
        id: u64,
        result: Result<Option<bool>, String>,
    },
    /// Outcome of one broadcast request.
    Broadcast {
        news_id: u64,
        platform: SharePlatform,
        result: Result<(), String>,
    },
    /// Outcome of a server-side ingest.
    Ingest(Result<IngestReport, String>),
}

/// Spawns backend calls and forwards their results.
#[derive(Clone)]
pub struct Syncer {
    backend: Arc<dyn NewsBackend>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<SyncMsg>,
}

impl Syncer {
    /// Create a syncer and the receiver the main loop should drain.
    pub fn new(
        backend: Arc<dyn NewsBackend>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SyncMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                runtime,
                tx,
            },
            rx,
        )
    }

    /// Run `job` against the backend and send its message.
    fn spawn<F, Fut>(&self, job: F)
    where
        F: FnOnce(Arc<dyn NewsBackend>) -> Fut + Send + 'static,
        Fut: Future<Output = SyncMsg> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let msg = job(backend).await;
            // If the receiver is gone the UI has exited; drop the result.
            if tx.send(msg).is_err() {
                debug!("sync result dropped, UI is gone");
            }
        });
    }

    /// Fetch news and topics concurrently, as two independent tasks.
    pub fn refresh(&self) {
        debug!(backend = self.backend.name(), "refreshing");
        self.spawn(|backend| async move {
            SyncMsg::News(backend.fetch_news().await.map_err(|e| e.to_string()))
        });
        self.spawn(|backend| async move {
            SyncMsg::Topics(backend.fetch_topics().await.map_err(|e| e.to_string()))
        });
    }

    pub fn persist_favorite(&self, id: u64) {
        self.spawn(move |backend| async move {
            let result = backend.toggle_favorite(id).await.map_err(|e| e.to_string());
            SyncMsg::Favorite { id, result }
        });
    }

    pub fn broadcast(&self, news_id: u64, platform: SharePlatform) {
        self.spawn(move |backend| async move {
            let result = backend
                .broadcast(news_id, platform)
                .await
                .map_err(|e| e.to_string());
            SyncMsg::Broadcast {
                news_id,
                platform,
                result,
            }
        });
    }

    pub fn ingest(&self) {
        self.spawn(|backend| async move {
            SyncMsg::Ingest(backend.trigger_ingest().await.map_err(|e| e.to_string()))
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{ApiError, Result};

    /// In-memory backend that records calls.
    #[derive(Default)]
    struct MemoryBackend {
        news: Vec<NewsItem>,
        topics: Vec<Topic>,
        fail_news: bool,
        fail_favorites: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MemoryBackend {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl NewsBackend for MemoryBackend {
        fn name(&self) -> &str {
            "memory"
        }

        async fn fetch_news(&self) -> Result<Vec<NewsItem>> {
            self.record("news".into());
            if self.fail_news {
                return Err(ApiError::Status {
                    url: "memory/news".into(),
                    status: 500,
                });
            }
            Ok(self.news.clone())
        }

        async fn fetch_topics(&self) -> Result<Vec<Topic>> {
            self.record("topics".into());
            Ok(self.topics.clone())
        }

        async fn toggle_favorite(&self, id: u64) -> Result<Option<bool>> {
            self.record(format!("favorite {id}"));
            if self.fail_favorites {
                return Err(ApiError::Backend("Item not found".into()));
            }
            Ok(Some(true))
        }

        async fn broadcast(&self, news_id: u64, platform: SharePlatform) -> Result<()> {
            self.record(format!("broadcast {news_id} {platform}"));
            Ok(())
        }

        async fn trigger_ingest(&self) -> Result<IngestReport> {
            self.record("ingest".into());
            Ok(IngestReport { new_items: 2 })
        }
    }

    fn item(id: u64) -> NewsItem {
        NewsItem {
            id,
            title: format!("Item {id}"),
            summary: None,
            url: format!("https://m.test/{id}"),
            source_id: None,
            source_name: "mem".into(),
            published_at: None,
            is_favorite: false,
        }
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<SyncMsg>) -> SyncMsg {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("sync message within timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn refresh_sends_news_and_topics() {
        let backend = Arc::new(MemoryBackend {
            news: vec![item(1), item(2)],
            ..Default::default()
        });
        let (syncer, mut rx) = Syncer::new(backend.clone(), Handle::current());

        syncer.refresh();
        let mut got = vec![recv(&mut rx).await, recv(&mut rx).await];
        got.sort_by_key(|msg| matches!(msg, SyncMsg::Topics(_)));

        assert_eq!(got[0], SyncMsg::News(Ok(vec![item(1), item(2)])));
        assert_eq!(got[1], SyncMsg::Topics(Ok(vec![])));
    }

    #[tokio::test]
    async fn failing_news_does_not_block_topics() {
        let backend = Arc::new(MemoryBackend {
            fail_news: true,
            ..Default::default()
        });
        let (syncer, mut rx) = Syncer::new(backend, Handle::current());

        syncer.refresh();
        let got = [recv(&mut rx).await, recv(&mut rx).await];

        assert!(got.iter().any(|m| matches!(m, SyncMsg::News(Err(e)) if e.contains("500"))));
        assert!(got.iter().any(|m| matches!(m, SyncMsg::Topics(Ok(_)))));
    }

    #[tokio::test]
    async fn favorite_failure_is_reported_not_raised() {
        let backend = Arc::new(MemoryBackend {
            fail_favorites: true,
            ..Default::default()
        });
        let (syncer, mut rx) = Syncer::new(backend.clone(), Handle::current());

        syncer.persist_favorite(7);

        match recv(&mut rx).await {
            SyncMsg::Favorite { id, result } => {
                assert_eq!(id, 7);
                assert!(result.unwrap_err().contains("Item not found"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(*backend.calls.lock().unwrap(), vec!["favorite 7".to_string()]);
    }

    #[tokio::test]
    async fn repeated_favorites_are_not_coalesced() {
        let backend = Arc::new(MemoryBackend::default());
        let (syncer, mut rx) = Syncer::new(backend.clone(), Handle::current());

        syncer.persist_favorite(1);
        syncer.persist_favorite(1);
        recv(&mut rx).await;
        recv(&mut rx).await;

        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn broadcast_and_ingest_report_back() {
        let backend = Arc::new(MemoryBackend::default());
        let (syncer, mut rx) = Syncer::new(backend, Handle::current());

        syncer.broadcast(3, SharePlatform::LinkedIn);
        assert_eq!(
            recv(&mut rx).await,
            SyncMsg::Broadcast {
                news_id: 3,
                platform: SharePlatform::LinkedIn,
                result: Ok(())
            }
        );

        syncer.ingest();
        assert_eq!(
            recv(&mut rx).await,
            SyncMsg::Ingest(Ok(IngestReport { new_items: 2 }))
        );
    }

    #[tokio::test]
    async fn dropped_receiver_is_harmless() {
        let backend = Arc::new(MemoryBackend::default());
        let (syncer, rx) = Syncer::new(backend.clone(), Handle::current());
        drop(rx);

        syncer.refresh();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }
}
