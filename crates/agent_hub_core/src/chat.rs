//! crates/agent_hub_core/src/chat.rs
//!
//! The e-book chat conversation: a bounded, append-only message list fed
//! by one webhook call per user submission.

use std::sync::Arc;

use crate::domain::ChatMessage;
use crate::ports::ChatBackend;

/// Opening assistant message shown before any user input.
pub const GREETING_TEXT: &str = "Olá! Pode enviar a sua dúvida sobre o e-book.";
/// Shown when the backend answered but carried no text payload.
pub const NO_ANSWER_TEXT: &str = "Não consegui obter resposta do servidor.";
/// Shown when the webhook call failed outright. The conversation remains
/// usable.
pub const CONNECTION_FAILURE_TEXT: &str = "Falha de conexão com o servidor. Tente novamente.";

/// One page-lifetime conversation. The user message is appended before
/// the backend call; the assistant reply (or a fixed failure placeholder)
/// after.
pub struct Conversation {
    backend: Arc<dyn ChatBackend>,
    messages: Vec<ChatMessage>,
    sending: bool,
}

impl Conversation {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            messages: vec![ChatMessage::assistant(GREETING_TEXT)],
            sending: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Advisory single-flight flag: the input stays disabled while a
    /// request is outstanding.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Sends one question. Returns `false` when the input was ignored
    /// (blank, or a send already in flight); the transcript is unchanged
    /// in that case.
    pub async fn send(&mut self, input: &str) -> bool {
        let pergunta = input.trim().to_string();
        if pergunta.is_empty() || self.sending {
            return false;
        }

        self.messages.push(ChatMessage::user(pergunta.clone()));
        self.sending = true;

        let reply = match self.backend.ask(&pergunta).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => NO_ANSWER_TEXT.to_string(),
            Err(_) => CONNECTION_FAILURE_TEXT.to_string(),
        };
        self.messages.push(ChatMessage::assistant(reply));

        self.sending = false;
        true
    }
}
