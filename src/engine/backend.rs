use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::model::message::Message;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Worth one more try: the network or the provider hiccupped.
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Transport(_))
            || self.status().is_some_and(|status| status >= 500)
    }

    /// Text shown to the player.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::MissingCredential => "API 키를 입력해 주세요.".to_string(),
            BackendError::Http { status: 400, .. } => {
                "API 키 형식이 올바르지 않습니다. (400)".to_string()
            }
            BackendError::Http {
                status: 401 | 403, ..
            } => "API 키가 거부되었습니다. 키와 권한을 확인해 주세요.".to_string(),
            BackendError::Http { status: 429, .. } => {
                "사용량 한도를 초과했습니다. 잠시 후 다시 시도해 주세요. (429)".to_string()
            }
            BackendError::Http { status, .. } if *status >= 500 => {
                format!("서버 오류가 발생했습니다. ({status})")
            }
            BackendError::Http { status, message } => format!("요청 실패 ({status}): {message}"),
            BackendError::Transport(_) => "네트워크에 연결할 수 없습니다.".to_string(),
            BackendError::InvalidResponse(_) => "응답을 해석할 수 없습니다.".to_string(),
        }
    }
}

/// Conversation context held on our side and sent with every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: Uuid,
    system_instruction: String,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    /// A fresh session primed with a previous log. System notes are dropped.
    pub fn with_history(system_instruction: impl Into<String>, messages: &[Message]) -> Self {
        let mut session = Self::new(system_instruction);
        session.history = messages
            .iter()
            .filter(|m| m.is_conversational())
            .cloned()
            .collect();
        session
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Called by backends once a reply has arrived; failed turns leave no trace.
    pub fn record_turn(&mut self, user_text: &str, reply: &str) {
        self.history.push(Message::user(user_text));
        self.history.push(Message::model(reply));
    }
}

/// The model service. Implementations block until the reply arrives.
pub trait ChatBackend: Send + Sync + Debug {
    fn create_session(&self, system_instruction: &str) -> ChatSession {
        ChatSession::new(system_instruction)
    }

    fn send_turn(&self, session: &mut ChatSession, text: &str) -> Result<String, BackendError>;

    /// One cheap round trip to validate the credential.
    fn check_connectivity(&self) -> Result<(), BackendError>;
}

pub type BackendRef = Arc<dyn ChatBackend>;

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentTurn {
        pub session_id: Uuid,
        pub text: String,
        pub history_len: usize,
    }

    /// Replays queued results in order and records every call.
    #[derive(Debug, Default)]
    pub struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, BackendError>>>,
        probes: Mutex<VecDeque<Result<(), BackendError>>>,
        sent: Mutex<Vec<SentTurn>>,
        probe_count: Mutex<usize>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, text: &str) -> &Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(&self, error: BackendError) -> &Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn probe(&self, result: Result<(), BackendError>) -> &Self {
            self.probes.lock().unwrap().push_back(result);
            self
        }

        pub fn sent(&self) -> Vec<SentTurn> {
            self.sent.lock().unwrap().clone()
        }

        pub fn probes_made(&self) -> usize {
            *self.probe_count.lock().unwrap()
        }
    }

    impl ChatBackend for ScriptedBackend {
        fn send_turn(
            &self,
            session: &mut ChatSession,
            text: &str,
        ) -> Result<String, BackendError> {
            self.sent.lock().unwrap().push(SentTurn {
                session_id: session.id,
                text: text.to_string(),
                history_len: session.history().len(),
            });

            let next = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".into())));

            if let Ok(reply) = &next {
                session.record_turn(text, reply);
            }
            next
        }

        fn check_connectivity(&self) -> Result<(), BackendError> {
            *self.probe_count.lock().unwrap() += 1;
            self.probes.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}
