//! Backend HTTP client
//!
//! One request per call, no retries. Every call either returns a fully
//! decoded value or an [`Error`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::error::{Error, Result};

use super::types::*;

/// Per-call timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Operations the dispatcher needs from the conversational backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat turn
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// List known conversations in backend order
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;

    /// Describe the tools available to the backend
    async fn list_tools(&self) -> Result<ToolCatalog>;
}

/// JSON-over-HTTP backend client
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Self::with_timeout(&config.url, Duration::from_secs(config.timeout_secs))
    }

    /// Create a client for `base_url` with an explicit per-call timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check the status, then decode the body
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            warn!("Backend error: {} - {}", status, body);
            return Err(Error::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Unexpected backend response: {} - {}", e, body);
            Error::Decode(e)
        })
    }
}

#[async_trait]
impl ChatBackend for BackendClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("chat");
        debug!(
            "Sending chat turn to {} (conversation: {:?})",
            url, request.conversation_id
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Error::Transport)?;

        let parsed: ChatResponse = Self::decode(response).await?;
        info!("Backend replied in conversation {}", parsed.conversation_id);
        Ok(parsed)
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let url = self.endpoint("conversations");
        debug!("Listing conversations from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::Transport)?;

        let list: ConversationList = Self::decode(response).await?;
        debug!("Received {} conversations", list.conversations.len());
        Ok(list.conversations)
    }

    async fn list_tools(&self) -> Result<ToolCatalog> {
        let url = self.endpoint("tools");
        debug!("Listing tools from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::with_timeout(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            BackendClient::with_timeout("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint("chat"), "http://localhost:8080/chat");
    }

    #[tokio::test]
    async fn test_send_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({ "input": "hello", "conversation_id": "abc123", "user_id": "42" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "output": "hi", "conversation_id": "abc123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest::new("hello").conversation("abc123").user(42u64);
        let response = client_for(&server).send_message(&request).await.unwrap();

        assert_eq!(response.output, "hi");
        assert_eq!(response.conversation_id, "abc123");
    }

    #[tokio::test]
    async fn test_send_message_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&ChatRequest::new("hello"))
            .await
            .unwrap_err();

        match err {
            Error::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_message_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "hi" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&ChatRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on the discard port
        let client =
            BackendClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.list_tools().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            BackendClient::with_timeout(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.list_tools().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_list_conversations_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversations": [
                    { "id": "b", "title": "Second", "created_at": "2024-05-02T00:00:00Z", "messages": [] },
                    { "id": "a", "title": "First", "created_at": "2024-05-01T00:00:00Z", "messages": [] }
                ]
            })))
            .mount(&server)
            .await;

        let conversations = client_for(&server).list_conversations().await.unwrap();
        let ids: Vec<_> = conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_list_conversations_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).list_conversations().await.unwrap_err();
        assert!(err.is_status());
    }

    #[tokio::test]
    async fn test_list_tools_is_opaque() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tools": [{ "name": "search", "description": "Web search", "parameters": {} }],
                "version": 3
            })))
            .mount(&server)
            .await;

        let tools = client_for(&server).list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools["version"], json!(3));
    }

    #[tokio::test]
    async fn test_list_tools_rejects_non_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["search"])))
            .mount(&server)
            .await;

        let err = client_for(&server).list_tools().await.unwrap_err();
        assert!(err.is_decode());
    }
}
