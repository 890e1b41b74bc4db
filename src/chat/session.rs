use log::{ error, info };
use std::collections::HashMap;
use std::sync::{ Arc, Mutex };
use std::time::{ Duration, Instant };
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::error::ChatTransportError;
use crate::llm::chat::ChatClient;
use crate::models::chat::ChatMessage;

/// What a single user submission did to the transcript.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Blank input, nothing appended or sent.
    Ignored,
    Replied,
    /// The user message stays in the transcript; no assistant reply was added.
    Failed(ChatTransportError),
}

/// One browser session's conversation. Starts with the system instruction and
/// only ever grows at the end.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { messages: vec![ChatMessage::system(system_prompt)] }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Everything after the system instruction, in order.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages[1..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub async fn submit(&mut self, client: &dyn ChatClient, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            return TurnOutcome::Ignored;
        }

        self.messages.push(ChatMessage::user(text));
        match client.chat(&self.messages).await {
            Ok(reply) => {
                info!("Chat turn complete, transcript now {} messages", self.messages.len() + 1);
                self.messages.push(ChatMessage::assistant(reply));
                TurnOutcome::Replied
            }
            Err(e) => {
                error!("Error communicating with chat endpoint: {}", e);
                TurnOutcome::Failed(e)
            }
        }
    }
}

struct SessionEntry {
    session: Arc<AsyncMutex<ChatSession>>,
    last_seen: Instant,
}

/// Per-visitor transcripts keyed by session id. The map lock is only held to
/// look up or insert; a turn in progress holds its own session lock.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    system_prompt: String,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(system_prompt: impl Into<String>, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            system_prompt: system_prompt.into(),
            idle_timeout,
        }
    }

    /// Returns the session for `id`, or a new one under a fresh id when `id`
    /// is absent, unknown, or expired. The bool is true for a new session.
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<AsyncMutex<ChatSession>>, bool) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        // A session some request still holds is in use, however long its turn takes.
        sessions.retain(|_, entry| {
            Arc::strong_count(&entry.session) > 1 ||
                now.duration_since(entry.last_seen) <= idle_timeout
        });

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.session.clone(), false);
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(AsyncMutex::new(ChatSession::new(self.system_prompt.clone())));
        sessions.insert(id, SessionEntry { session: session.clone(), last_seen: now });
        info!("New chat session {} ({} active)", id, sessions.len());
        (id, session, true)
    }

    pub fn active(&self) -> usize {
        self.sessions
            .lock()
            .map(|s| s.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}
