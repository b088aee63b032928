use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use log::{error, info, warn};

use crate::config::AppConfig;
use crate::engine::backend::BackendRef;
use crate::engine::connectivity::verify_credential;
use crate::engine::llm_client::GeminiBackend;
use crate::engine::protocol::{CredentialStatus, EngineCommand, EngineResponse, Notice};
use crate::engine::session::{GameSession, PendingTurn, SessionError};
use crate::storage::repository::{clear_credential, load_credential, save_credential};
use crate::storage::StoreRef;

/// Owns the game session on a background thread. Blocking backend calls
/// happen here, never on the UI thread.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    config: AppConfig,
    store: StoreRef,
    session: GameSession,
    has_credential: bool,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        config: AppConfig,
        store: StoreRef,
    ) -> Self {
        let api_key = config
            .api_key_override
            .clone()
            .or_else(|| load_credential(store.as_ref()))
            .unwrap_or_default();
        let has_credential = !api_key.trim().is_empty();

        let backend: BackendRef = Arc::new(GeminiBackend::new(&config, api_key));
        let session = GameSession::new(backend, store.clone(), config.prologue_enabled);

        Self {
            rx,
            tx,
            config,
            store,
            session,
            has_credential,
        }
    }

    pub fn run(&mut self) {
        self.send_view();
        self.send(EngineResponse::Credential(if self.has_credential {
            CredentialStatus::Accepted
        } else {
            CredentialStatus::Missing
        }));

        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::SubmitCredential(key) => self.submit_credential(key),
                EngineCommand::ClearCredential => self.clear_credential(),
                cmd => {
                    let result = self.handle(cmd);
                    self.finish(result);
                }
            }
        }

        info!("engine channel closed, stopping");
    }

    fn handle(&mut self, cmd: EngineCommand) -> Result<Vec<Notice>, SessionError> {
        let s = &mut self.session;
        match cmd {
            EngineCommand::Proceed => s.proceed(),
            EngineCommand::ChooseFreshStart => s.choose_fresh_start(),
            EngineCommand::ChooseLegacy => s.choose_legacy(),
            EngineCommand::ChoosePerk(name) => s.choose_perk(&name),
            EngineCommand::GoBack => s.go_back(),
            EngineCommand::AdvancePrologue => s.advance_prologue(),
            EngineCommand::SaveSlot(slot) => s.save_slot(slot),
            EngineCommand::DeleteSlot(slot) => s.delete_slot(slot),

            EngineCommand::ChooseJob(id) => {
                let pending = s.choose_job(&id)?;
                Ok(self.run_pending(pending))
            }
            EngineCommand::SubmitAction(text) => {
                let pending = s.begin_turn(&text)?;
                Ok(self.run_pending(pending))
            }
            EngineCommand::LoadSlot(slot) => {
                let mut notices = vec![Notice::Info(format!("슬롯 {}을 불러왔습니다.", slot + 1))];
                if let Some(pending) = s.load_slot(slot)? {
                    notices.extend(self.run_pending(pending));
                }
                Ok(notices)
            }

            EngineCommand::SubmitCredential(_) | EngineCommand::ClearCredential => Ok(Vec::new()),
        }
    }

    /// Publish the busy view, then block on the backend.
    fn run_pending(&mut self, pending: PendingTurn) -> Vec<Notice> {
        self.send_view();
        self.session.run_turn(pending)
    }

    fn finish(&mut self, result: Result<Vec<Notice>, SessionError>) {
        let notices = result.unwrap_or_else(|e| {
            warn!("command rejected: {e}");
            vec![Notice::Warning(rejection_text(&e))]
        });

        if !notices.is_empty() {
            self.send(EngineResponse::Notices(notices));
        }
        self.send_view();
    }

    fn submit_credential(&mut self, key: String) {
        let key = key.trim().to_string();
        self.send(EngineResponse::Credential(CredentialStatus::Verifying));

        let backend = GeminiBackend::new(&self.config, key.clone());
        match verify_credential(&backend, &key, self.config.connectivity_retry_delay) {
            Ok(()) => {
                if let Err(e) = save_credential(self.store.as_ref(), &key) {
                    error!("failed to persist credential: {e}");
                }
                self.session.replace_backend(Arc::new(backend));
                self.has_credential = true;
                self.send(EngineResponse::Credential(CredentialStatus::Accepted));
            }
            Err(e) => {
                self.send(EngineResponse::Credential(CredentialStatus::Rejected(
                    e.user_message(),
                )));
            }
        }
    }

    fn clear_credential(&mut self) {
        if let Err(e) = clear_credential(self.store.as_ref()) {
            error!("failed to clear credential: {e}");
        }
        self.session
            .replace_backend(Arc::new(GeminiBackend::new(&self.config, String::new())));
        self.has_credential = false;
        self.send(EngineResponse::Credential(CredentialStatus::Missing));
    }

    fn send_view(&self) {
        self.send(EngineResponse::View(Box::new(self.session.view())));
    }

    fn send(&self, response: EngineResponse) {
        if self.tx.send(response).is_err() {
            warn!("UI has gone away, dropping engine response");
        }
    }
}

fn rejection_text(e: &SessionError) -> String {
    match e {
        SessionError::Busy => "이전 요청을 처리하는 중입니다.".into(),
        SessionError::SaveDuringPrologue => "프롤로그 중에는 저장할 수 없습니다.".into(),
        SessionError::EmptySlot(slot) => format!("슬롯 {}이 비어 있습니다.", slot + 1),
        SessionError::EmptyInput => "행동을 입력해 주세요.".into(),
        e => e.to_string(),
    }
}
