//! HTTP client for the generation and evaluation service

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use promptlab_core::{
    Error, EvaluationBackend, Metric, ModelResponses, Result, ScoreMap, TimeRange,
};

use crate::config::BackendConfig;

/// Evaluation backend reached over HTTP
pub struct HttpBackend {
    config: BackendConfig,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    responses: &'a ModelResponses,
}

impl HttpBackend {
    /// Create a new backend client from configuration
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new backend client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = BackendConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode(path, response).await
    }

    async fn get_json<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode(path, response).await
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

async fn decode<R: DeserializeOwned>(path: &str, response: Response) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(Error::Backend(format!(
            "{} failed with status {}: {}",
            path, status, error_text
        )));
    }

    let text = response.text().await.map_err(map_transport_error)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Serialization(format!("Unexpected {} response: {}", path, e)))
}

#[async_trait]
impl EvaluationBackend for HttpBackend {
    async fn generate(&self, prompt: &str) -> Result<ModelResponses> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput("Prompt must not be empty".to_string()));
        }

        let responses: ModelResponses = self.post_json("/generate", &GenerateRequest { prompt }).await?;
        debug!(models = responses.len(), "generated responses");
        Ok(responses)
    }

    async fn evaluate(&self, metric: Metric, responses: &ModelResponses) -> Result<ScoreMap> {
        self.post_json(metric.endpoint(), &EvaluateRequest { responses }).await
    }

    async fn analytics(&self, range: TimeRange) -> Result<serde_json::Value> {
        self.get_json("/analytics", &[("timeRange", range.as_str())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned HTTP response and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            tx.send(String::from_utf8_lossy(&raw).into_owned()).ok();
        });

        (format!("http://{}", addr), rx)
    }

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(BackendConfig::new(base_url).unwrap().with_timeout(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_prompt() {
        let (url, request) = serve_once("200 OK", r#"{"Mistral 7B":"Paris.","NeMo":"It is Paris."}"#).await;

        let responses = backend(&url).generate("Capital of France?").await.unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses["NeMo"], "It is Paris.");

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /generate HTTP/1.1"));
        assert!(request.contains(r#"{"prompt":"Capital of France?"}"#));
    }

    #[tokio::test]
    async fn test_evaluate_uses_metric_endpoint() {
        let (url, request) = serve_once("200 OK", r#"{"a":0.25}"#).await;

        let mut responses = ModelResponses::new();
        responses.insert("a".to_string(), "text".to_string());

        let scores = backend(&url).evaluate(Metric::Readability, &responses).await.unwrap();
        assert_eq!(scores["a"], 0.25);

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /evaluate_readability HTTP/1.1"));
        assert!(request.contains(r#"{"responses":{"a":"text"}}"#));
    }

    #[tokio::test]
    async fn test_analytics_sends_time_range() {
        let (url, request) = serve_once("200 OK", r#"{"trends":[]}"#).await;

        let bundle = backend(&url).analytics(TimeRange::Month).await.unwrap();
        assert!(bundle["trends"].is_array());

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /analytics?timeRange=30d HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, _request) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;

        let err = backend(&url).generate("Capital of France?").await.unwrap_err();
        match err {
            Error::Backend(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (url, _request) = serve_once("200 OK", r#"["not","a","map"]"#).await;

        let err = backend(&url).generate("Capital of France?").await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_locally() {
        let err = backend("http://127.0.0.1:9").generate("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
