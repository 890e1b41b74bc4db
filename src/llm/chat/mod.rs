pub mod ollama;

use async_trait::async_trait;
use std::sync::Arc;

use super::LlmConfig;
use self::ollama::OllamaClient;
use crate::error::ChatTransportError;
use crate::models::chat::ChatMessage;

/// A chat-completion backend. Receives the whole transcript, returns the next
/// assistant reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatTransportError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Arc<dyn ChatClient> {
    Arc::new(OllamaClient::from_config(config))
}
