use super::SearchBackend;
use super::types::{SearchRequest, SearchResult};
use crate::config::Config;
use crate::error::{Result, TavilyError};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const CONNECT_TIMEOUT: u64 = 10;

#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
}

impl TavilyClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))
            .map_err(|_| TavilyError::ConfigInvalid("TAVILY_API_KEY contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tavily-search-mcp/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TavilyError::ConfigInvalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl SearchBackend for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let url = format!("{}/search", self.base_url);
        let start = Instant::now();

        let resp = self.client.post(&url).json(request).send().await.map_err(|e| {
            warn!("Tavily request failed: {}", e);
            TavilyError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Tavily API returned HTTP {}", status.as_u16());
            return Err(backend_error(status, body.trim()));
        }

        let result = resp.json::<SearchResult>().await?;
        debug!(
            "Tavily search returned {} results in {}ms",
            result.results.len(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}

fn backend_error(status: StatusCode, body: &str) -> TavilyError {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let status_text = if body.is_empty() { reason.to_string() } else { format!("{reason}: {body}") };
    TavilyError::Backend { status: status.as_u16(), status_text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tavily::types::{SearchDepth, Topic};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String) -> Config {
        Config {
            api_url: url,
            api_key: "tvly-test-key".into(),
            timeout_secs: 5,
            include_domains: vec![],
            exclude_domains: vec![],
        }
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            search_depth: SearchDepth::Basic,
            topic: Topic::General,
            days: 3,
            time_range: None,
            max_results: 5,
            include_images: false,
            include_image_descriptions: false,
            include_answer: true,
            include_raw_content: false,
            include_domains: vec![],
            exclude_domains: vec![],
        }
    }

    #[tokio::test]
    async fn posts_normalized_body_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test-key"))
            .and(body_partial_json(serde_json::json!({
                "query": "rust ownership",
                "search_depth": "basic",
                "include_answer": true,
                "max_results": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "rust ownership",
                "answer": "Rust uses ownership to manage memory.",
                "response_time": 0.8,
                "results": [{
                    "title": "Ownership - Rust Book",
                    "url": "https://doc.rust-lang.org/book/ch04-00-ownership.html",
                    "content": "Ownership is a set of rules.",
                    "score": 0.9
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new(&config(server.uri())).unwrap();
        let result = client.search(&request("rust ownership")).await.unwrap();

        assert_eq!(result.answer.as_deref(), Some("Rust uses ownership to manage memory."));
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].title, "Ownership - Rust Book");
    }

    #[tokio::test]
    async fn non_success_maps_to_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new(&config(server.uri())).unwrap();
        let err = client.search(&request("q")).await.unwrap_err();

        match err {
            TavilyError::Backend { status, status_text } => {
                assert_eq!(status, 401);
                assert_eq!(status_text, "Unauthorized: invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new(&config(server.uri())).unwrap();
        let err = client.search(&request("q")).await.unwrap_err();
        assert!(matches!(err, TavilyError::Backend { status: 503, ref status_text } if status_text == "Service Unavailable"));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = TavilyClient::new(&config("http://127.0.0.1:9".into())).unwrap();
        let err = client.search(&request("q")).await.unwrap_err();
        assert!(matches!(err, TavilyError::Transport(_)));
    }
}
