//! HTTP implementation of [`NewsBackend`].
//!
//! Talks JSON to the dashboard backend with [`reqwest`].  Response parsing
//! goes through the same `decode` path for every endpoint, so status
//! handling and error mapping live in one place.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{IngestReport, NewsBackend, NewsItem, Topic};
use crate::error::{ApiError, Result};
use crate::share::SharePlatform;

/// Client for the news backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base address without a trailing slash, e.g. `http://localhost:8000`.
    base_url: String,
    client: Client,
}

/// Body of `POST /news/{id}/favorite`.
#[derive(Debug, Deserialize)]
struct FavoriteResponse {
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

/// Body of `POST /fetch-news`.
#[derive(Debug, Deserialize)]
struct IngestResponse {
    #[serde(default)]
    new_items_saved: u64,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// A trailing `/` is trimmed so endpoint paths can always start with one.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Request {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        Self::decode(url, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.clone(),
            source,
        })?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}

#[async_trait::async_trait]
impl NewsBackend for ApiClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_news(&self) -> Result<Vec<NewsItem>> {
        self.get_json("/news").await
    }

    async fn fetch_topics(&self) -> Result<Vec<Topic>> {
        self.get_json("/topics").await
    }

    async fn toggle_favorite(&self, id: u64) -> Result<Option<bool>> {
        let body: FavoriteResponse = self
            .post_json(&format!("/news/{id}/favorite"), None)
            .await?;
        match body.error {
            Some(error) => Err(ApiError::Backend(error)),
            None => Ok(body.is_favorite),
        }
    }

    async fn broadcast(&self, news_id: u64, platform: SharePlatform) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "/broadcast",
                Some(json!({ "news_id": news_id, "platform": platform })),
            )
            .await?;
        Ok(())
    }

    async fn trigger_ingest(&self) -> Result<IngestReport> {
        let body: IngestResponse = self.post_json("/fetch-news", None).await?;
        Ok(IngestReport {
            new_items: body.new_items_saved,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("/news"), "http://localhost:8000/news");
    }

    #[tokio::test]
    async fn fetch_news_decodes_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "One", "url": "https://x.test/1", "source_id": 1,
                 "source_name": "X", "published_at": "2025-01-01T00:00:00", "is_favorite": false,
                 "summary": "<p>s</p>"},
                {"id": 2, "title": "Two", "url": "https://x.test/2", "source_id": 1,
                 "source_name": "X", "published_at": null, "is_favorite": true, "summary": null}
            ])))
            .mount(&server)
            .await;

        let news = client_for(&server).fetch_news().await.unwrap();

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "One");
        assert!(news[1].is_favorite);
    }

    #[tokio::test]
    async fn fetch_topics_keeps_backend_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 9, "title": "Hot", "summary": null, "popularity_score": 3.0, "url": "#"},
                {"id": 4, "title": "Warm", "summary": "x", "popularity_score": 5.0, "url": "https://w.test",
                 "articles": [{"id": 1, "title": "a", "url": "https://a.test", "source_id": 2, "published_at": null}]}
            ])))
            .mount(&server)
            .await;

        let topics = client_for(&server).fetch_topics().await.unwrap();

        let ids: Vec<u64> = topics.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![9, 4], "no local re-sort by score");
        assert_eq!(topics[1].articles.len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_news().await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 503, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_topics().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn toggle_favorite_returns_server_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/news/42/favorite"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "success", "is_favorite": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let flag = client_for(&server).toggle_favorite(42).await.unwrap();

        assert_eq!(flag, Some(true));
    }

    #[tokio::test]
    async fn toggle_favorite_surfaces_body_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/news/5/favorite"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "Item not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).toggle_favorite(5).await.unwrap_err();

        assert!(matches!(err, ApiError::Backend(ref m) if m == "Item not found"));
    }

    #[tokio::test]
    async fn broadcast_posts_news_id_and_platform() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/broadcast"))
            .and(body_json(serde_json::json!({"news_id": 3, "platform": "WhatsApp"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success", "platform": "WhatsApp", "message": "Broadcast Logged"
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .broadcast(3, SharePlatform::WhatsApp)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn trigger_ingest_reports_new_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fetch-news"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success", "new_items_saved": 17, "clustering": "completed"
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).trigger_ingest().await.unwrap();

        assert_eq!(report.new_items, 17);
    }
}
