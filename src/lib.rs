pub mod chat;
pub mod cli;
pub mod error;
pub mod llm;
pub mod models;
pub mod predictor;
pub mod server;

use chat::SessionStore;
use cli::Args;
use llm::LlmConfig;
use llm::chat::{ new_client as new_chat_client, ChatClient };
use log::info;
use predictor::Predictor;
use server::api::AppState;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Model Path: {}", args.model_path);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Session Idle Timeout: {}s", args.session_idle_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let predictor = Predictor::load(&args.model_path);

    let chat_config = LlmConfig {
        base_url: Some(args.chat_base_url.clone()),
        completion_model: Some(args.chat_model.clone()),
    };
    let chat_client = new_chat_client(&chat_config);
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        chat_client.get_model(),
        chat_client.get_base_url().as_deref().unwrap_or("adapter default")
    );

    let sessions = Arc::new(
        SessionStore::new(args.system_prompt.clone(), Duration::from_secs(args.session_idle_secs))
    );

    let state = AppState {
        predictor,
        chat_client,
        sessions,
        secure_cookie: args.enable_tls,
    };
    let server = Server::new(args.server_addr.clone(), state, args.clone());
    server.run().await?;

    Ok(())
}
