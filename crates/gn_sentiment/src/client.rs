use gn_core::{ClientConfig, Error, Result, Sentiment, SentimentAnalysis};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Client for a running sentiment service.
pub struct SentimentClient {
    client: Client,
    config: ClientConfig,
}

impl fmt::Debug for SentimentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .field("fallback", &self.config.fallback)
            .finish()
    }
}

impl SentimentClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `text` to the service and decode the analysis. Any transport
    /// failure, non-success status or error payload is an `Err`.
    pub async fn analyze(&self, text: &str) -> Result<SentimentAnalysis> {
        let body: Value = self
            .client
            .post(self.config.base_url.clone())
            .json(&AnalyzeRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = body.get("error") {
            let message = message.as_str().unwrap_or("unknown error").to_string();
            return Err(Error::Sentiment(message));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Classify `text`, substituting the configured fallback label when the
    /// service cannot produce an answer.
    pub async fn classify_or_fallback(&self, text: &str) -> Sentiment {
        match self.analyze(text).await {
            Ok(analysis) => {
                info!("🧠 Sentiment analyzed: {}", analysis.classification);
                analysis.classification
            }
            Err(e) => {
                warn!(
                    "⚠️ Could not analyze sentiment ({}). Using default value: {}",
                    e, self.config.fallback
                );
                self.config.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn stub_service(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    async fn unused_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    fn client_for(url: &str) -> SentimentClient {
        let config = ClientConfig::new(url).unwrap().with_timeout(Duration::from_secs(2));
        SentimentClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_when_unreachable() {
        let client = client_for(&unused_address().await);
        assert!(client.analyze("Gold prices rise").await.is_err());
        assert_eq!(client.classify_or_fallback("Gold prices rise").await, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_fallback_on_error_payload() {
        let router = Router::new().route(
            "/",
            post(|| async { Json(serde_json::json!({"error": "No text provided"})) }),
        );
        let client = client_for(&stub_service(router).await);

        match client.analyze("").await {
            Err(Error::Sentiment(message)) => assert_eq!(message, "No text provided"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(client.classify_or_fallback("").await, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_fallback_on_non_json() {
        let router = Router::new().route("/", post(|| async { "not json" }));
        let client = client_for(&stub_service(router).await);
        assert_eq!(client.classify_or_fallback("Gold").await, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_fallback_on_timeout() {
        let router = Router::new().route(
            "/",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({}))
            }),
        );
        let url = stub_service(router).await;
        let config = ClientConfig::new(&url).unwrap().with_timeout(Duration::from_millis(200));
        let client = SentimentClient::new(config).unwrap();
        assert_eq!(client.classify_or_fallback("Gold").await, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_decodes_analysis() {
        let router = Router::new().route(
            "/",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["text"], "great news");
                Json(serde_json::json!({
                    "neg": 0.0, "neu": 0.328, "pos": 0.672, "compound": 0.6249,
                    "classification": "positive"
                }))
            }),
        );
        let client = client_for(&stub_service(router).await);

        let analysis = client.analyze("great news").await.unwrap();
        assert_eq!(analysis.classification, Sentiment::Positive);
        assert_eq!(analysis.scores.compound, 0.6249);
        assert_eq!(client.classify_or_fallback("great news").await, Sentiment::Positive);
    }
}
