use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::{info, warn};

use crate::content::FeedPayload;
use crate::error::UpstreamError;

/// The one outbound dependency: a single JSON feed at a fixed URL.
///
/// Every call is an independent GET. Nothing is cached between calls and a
/// failed request is not retried.
pub struct Upstream {
    client: Client,
    url: String,
}

impl Upstream {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent("FlashNews/1.0 (News Proxy)")
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn fetch_bytes(&self) -> Result<Bytes, UpstreamError> {
        info!("Fetching upstream feed: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        Ok(response.bytes().await?)
    }

    /// Fetch the upstream body byte for byte. Non-2xx statuses, transport
    /// failures and bodies that are not JSON are all [`UpstreamError`]s.
    pub async fn fetch_raw(&self) -> Result<Bytes, UpstreamError> {
        let body = self.fetch_bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&body)?;
        Ok(body)
    }

    async fn fetch_json(&self) -> Result<Value, UpstreamError> {
        let body = self.fetch_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch and normalize. Any upstream failure degrades to the empty
    /// payload so pages render their "nothing here" state instead of failing.
    pub async fn load_feed(&self) -> FeedPayload {
        match self.fetch_json().await {
            Ok(body) => {
                let payload = FeedPayload::from_upstream(&body);
                info!(
                    "Loaded {} news, {} blogs, {} videos, {} galleries",
                    payload.news.len(),
                    payload.blogs.len(),
                    payload.videos.len(),
                    payload.galleries.len()
                );
                payload
            }
            Err(e) => {
                warn!("Upstream feed unavailable, rendering empty content: {}", e);
                FeedPayload::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_upstream(template: ResponseTemplate) -> (MockServer, Upstream) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(template)
            .mount(&server)
            .await;

        let upstream = Upstream::new(format!("{}/feed", server.uri())).unwrap();
        (server, upstream)
    }

    mod fetch_raw_tests {
        use super::*;

        #[tokio::test]
        async fn test_returns_body_verbatim() {
            // Key order, trailing zeros and oversized integers must survive
            let body = r#"{"zeta":1,"data":{"news":[]},"alpha":1.50,"big":12345678901234567890123}"#;
            let (_server, upstream) =
                mock_upstream(ResponseTemplate::new(200).set_body_string(body)).await;

            let result = upstream.fetch_raw().await.unwrap();
            assert_eq!(&result[..], body.as_bytes());
        }

        #[tokio::test]
        async fn test_sends_json_accept_header() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/feed"))
                .and(header("accept", "application/json"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;

            let upstream = Upstream::new(format!("{}/feed", server.uri())).unwrap();
            assert!(upstream.fetch_raw().await.is_ok());
        }

        #[tokio::test]
        async fn test_non_success_status_is_error() {
            let (_server, upstream) = mock_upstream(ResponseTemplate::new(503)).await;

            let result = upstream.fetch_raw().await;
            assert!(matches!(
                result,
                Err(UpstreamError::Status(status)) if status.as_u16() == 503
            ));
        }

        #[tokio::test]
        async fn test_invalid_json_is_error() {
            let (_server, upstream) =
                mock_upstream(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
                    .await;

            let result = upstream.fetch_raw().await;
            assert!(matches!(result, Err(UpstreamError::Decode(_))));
        }

        #[tokio::test]
        async fn test_connection_failure_is_error() {
            // Nothing listens on port 1
            let upstream = Upstream::new("http://127.0.0.1:1/feed").unwrap();

            let result = upstream.fetch_raw().await;
            assert!(matches!(result, Err(UpstreamError::Request(_))));
        }

        #[tokio::test]
        async fn test_each_call_hits_upstream() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/feed"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "news": [] })))
                .expect(3)
                .mount(&server)
                .await;

            let upstream = Upstream::new(format!("{}/feed", server.uri())).unwrap();
            for _ in 0..3 {
                upstream.fetch_raw().await.unwrap();
            }
            // Expectations are verified when `server` drops
        }
    }

    mod load_feed_tests {
        use super::*;

        #[tokio::test]
        async fn test_normalizes_payload() {
            let body = json!({
                "data": {
                    "news": [{ "news_Title": "One", "slug": "one" }],
                    "videos": [{ "videoTitle": "Clip" }]
                }
            });
            let (_server, upstream) =
                mock_upstream(ResponseTemplate::new(200).set_body_json(body)).await;

            let payload = upstream.load_feed().await;
            assert_eq!(payload.news.len(), 1);
            assert_eq!(payload.news[0].slug.as_deref(), Some("one"));
            assert_eq!(payload.videos.len(), 1);
            assert!(payload.blogs.is_empty());
        }

        #[tokio::test]
        async fn test_failure_yields_empty_payload() {
            let (_server, upstream) = mock_upstream(ResponseTemplate::new(500)).await;

            let payload = upstream.load_feed().await;
            assert!(payload.is_empty());
        }

        #[tokio::test]
        async fn test_invalid_json_yields_empty_payload() {
            let (_server, upstream) =
                mock_upstream(ResponseTemplate::new(200).set_body_string("not json")).await;

            assert!(upstream.load_feed().await.is_empty());
        }

        #[tokio::test]
        async fn test_unreachable_yields_empty_payload() {
            let upstream = Upstream::new("http://127.0.0.1:1/feed").unwrap();
            assert!(upstream.load_feed().await.is_empty());
        }
    }
}
