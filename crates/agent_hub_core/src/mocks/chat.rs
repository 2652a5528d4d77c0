//! Mock chat backend for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::ports::{ChatBackend, ChatTransportError};

/// Chat backend replaying a scripted queue of replies.
#[derive(Default)]
pub struct MockChatBackend {
    replies: Mutex<VecDeque<Result<Option<String>, String>>>,
    pub calls: AtomicUsize,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Some(text.to_string())));
    }

    /// Next call answers without a text payload.
    pub fn push_empty_reply(&self) {
        self.replies.lock().unwrap().push_back(Ok(None));
    }

    /// Next call fails at the transport level.
    pub fn push_failure(&self) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err("connection refused".to_string()));
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn ask(&self, _pergunta: &str) -> Result<Option<String>, ChatTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(ChatTransportError(e)),
            None => Ok(None),
        }
    }
}
