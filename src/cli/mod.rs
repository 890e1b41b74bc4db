use clap::Parser;

use crate::chat::DEFAULT_SYSTEM_PROMPT;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Predictor Args ---
    /// Path to the exported transfer fee model (JSON linear regression artifact).
    #[arg(long, env = "MODEL_PATH", default_value = "transfer_fee_model.json")]
    pub model_path: String,

    // --- Chat LLM Provider Args ---
    /// Base URL for the Ollama server (the chat endpoint is {base}/api/chat)
    #[arg(long, env = "CHAT_BASE_URL", default_value = "http://localhost:11434")]
    pub chat_base_url: String,

    /// Model name for chat completion (e.g., llama3, mistral)
    #[arg(long, env = "CHAT_MODEL", default_value = "llama3")]
    pub chat_model: String,

    /// System instruction placed at the start of every conversation.
    #[arg(long, env = "SYSTEM_PROMPT", default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system_prompt: String,

    /// Seconds of inactivity after which a chat session is forgotten.
    #[arg(long, env = "SESSION_IDLE_SECS", default_value = "3600")]
    pub session_idle_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address and port for the web page to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8501")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for serving HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for serving HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
