use async_trait::async_trait;
use log::{ debug, info };
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::ChatClient;
use crate::error::ChatTransportError;
use crate::llm::LlmConfig;
use crate::models::chat::ChatMessage;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(base_url: Option<String>, completion_model: Option<String>) -> Self {
        let model = completion_model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            http: HttpClient::new(),
            base_url: url.trim_end_matches('/').to_string(),
            completion_model: model,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.base_url.clone(), config.completion_model.clone())
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatTransportError> {
        let url = self.chat_url();
        let req = ChatRequest {
            model: &self.completion_model,
            messages,
            stream: false,
        };
        info!("Sending {} messages to {} (model {})", messages.len(), url, self.completion_model);

        let resp = self.http
            .post(&url)
            .json(&req)
            .send().await
            .map_err(|source| ChatTransportError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatTransportError::Status { url, status: status.as_u16() });
        }

        let body = resp
            .text().await
            .map_err(|source| ChatTransportError::Request { url: url.clone(), source })?;
        debug!("Chat reply body: {}", body);

        let data = serde_json
            ::from_str::<ChatResponse>(&body)
            .map_err(|e| ChatTransportError::Decode { url, reason: e.to_string() })?;
        Ok(data.message.content)
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{ extract::State, http::StatusCode, routing::post, Json, Router };
    use serde_json::{ json, Value };
    use std::sync::{ Arc, Mutex };

    type Captured = Arc<Mutex<Vec<Value>>>;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn recording_reply(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        captured.lock().unwrap().push(body);
        Json(json!({ "message": { "role": "assistant", "content": "Germany" }, "done": true }))
    }

    #[tokio::test]
    async fn posts_full_transcript_without_streaming() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route("/api/chat", post(recording_reply))
            .with_state(captured.clone());
        let base_url = spawn_stub(router).await;

        let client = OllamaClient::new(Some(base_url), None);
        let transcript = vec![
            ChatMessage::system("You are a football expert assistant."),
            ChatMessage::user("Who won the 2014 World Cup?")
        ];
        let reply = client.chat(&transcript).await.unwrap();
        assert_eq!(reply, "Germany");

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            json!({
                "model": "llama3",
                "messages": [
                    { "role": "system", "content": "You are a football expert assistant." },
                    { "role": "user", "content": "Who won the 2014 World Cup?" }
                ],
                "stream": false
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") })
        );
        let client = OllamaClient::new(Some(spawn_stub(router).await), None);
        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, ChatTransportError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_reply_is_a_decode_error() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { Json(json!({ "response": "wrong endpoint shape" })) })
        );
        let client = OllamaClient::new(Some(spawn_stub(router).await), None);
        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, ChatTransportError::Decode { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OllamaClient::new(Some(format!("http://{}", addr)), None);
        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, ChatTransportError::Request { .. }));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = OllamaClient::new(Some("http://localhost:11434/".into()), Some("mistral".into()));
        assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(client.get_model(), "mistral");
    }
}
