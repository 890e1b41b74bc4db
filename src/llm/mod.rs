pub mod chat;

#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub completion_model: Option<String>,
}
