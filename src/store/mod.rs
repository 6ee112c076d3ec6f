//! The single state container.
//!
//! `Store` owns the current `AppState` snapshot behind an `Arc`. Commands
//! take `&mut self`, build the next snapshot copy-on-write and publish it on
//! a watch channel, so readers only ever see whole transitions.

mod auth;
mod boards;
pub mod cache;
mod columns;
mod members;
mod notifications;
pub mod state;
mod tasks;

pub use cache::{CacheState, ResourceCache, ResourceKey};
pub use state::{AppState, AuthState, UiState};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::{ApiClient, ApiError};
use crate::config::{Config, MutationMode};
use crate::dnd::DropCommand;
use crate::ordering::OrderingError;
use crate::session::SessionFile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("{kind} {id} is not loaded")]
    NotLoaded { kind: &'static str, id: String },

    #[error("Session file error: {0}")]
    Session(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Api(e) if e.is_unauthorized())
    }

    pub(crate) fn not_loaded(kind: &'static str, id: &str) -> Self {
        StoreError::NotLoaded {
            kind,
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct Store {
    client: ApiClient,
    state: Arc<AppState>,
    publisher: watch::Sender<Arc<AppState>>,
    mode: MutationMode,
    session: Option<SessionFile>,
}

impl Store {
    pub fn new(client: ApiClient) -> Self {
        let mut state = AppState::default();
        state.auth.is_authenticated = client.token().is_some();
        let state = Arc::new(state);
        let (publisher, _) = watch::channel(state.clone());
        Self {
            client,
            state,
            publisher,
            mode: MutationMode::default(),
            session: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store = Self::new(config.api_client()).with_mode(config.mutation_mode);
        match &config.session_file {
            Some(path) => store.with_session(SessionFile::new(path)),
            None => store,
        }
    }

    pub fn with_mode(mut self, mode: MutationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_session(mut self, session: SessionFile) -> Self {
        self.session = Some(session);
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn mode(&self) -> MutationMode {
        self.mode
    }

    /// The current state. The returned snapshot never changes.
    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.publisher.subscribe()
    }

    pub fn clear_error(&mut self) {
        self.commit(|state| state.ui.error = None);
    }

    pub fn invalidate(&mut self, key: &ResourceKey) {
        self.commit(|state| state.cache.mark_stale(key));
    }

    pub fn select_board(&mut self, board_id: Option<&str>) {
        let board_id = board_id.map(str::to_string);
        self.commit(|state| state.current_board = board_id);
    }

    /// Routes a completed drag gesture to the matching ordering command.
    pub async fn apply_drop(&mut self, command: DropCommand) -> StoreResult<()> {
        match command {
            DropCommand::ReorderColumns { board_id, from, to } => {
                self.reorder_columns(&board_id, from, to).await
            }
            DropCommand::MoveTask {
                task_id,
                target_column_id,
                new_position,
                ..
            } => self.move_task(&task_id, &target_column_id, new_position).await,
        }
    }

    // * Plumbing .............................................................

    pub(crate) fn commit<R>(&mut self, mutate: impl FnOnce(&mut AppState) -> R) -> R {
        let result = mutate(Arc::make_mut(&mut self.state));
        self.publisher.send_replace(self.state.clone());
        result
    }

    pub(crate) fn begin(&mut self) {
        self.commit(|state| state.ui.loading = true);
    }

    /// Starts a fetch for `key` unless it is already loading or fresh.
    pub(crate) fn begin_fetch(&mut self, key: &ResourceKey) -> bool {
        if !self.state.cache.should_fetch(key) {
            debug!("Skipping fetch of {:?}: {:?}", key, self.state.cache.state(key));
            return false;
        }
        let key = key.clone();
        self.commit(|state| {
            state.cache.mark_loading(key);
            state.ui.loading = true;
        });
        true
    }

    /// Settles an action: resets `loading`, records or clears the error and
    /// performs the global logout on 401.
    pub(crate) fn finish<T>(&mut self, result: StoreResult<T>) -> StoreResult<T> {
        match &result {
            Ok(_) => self.commit(|state| {
                state.ui.loading = false;
                state.ui.error = None;
            }),
            Err(e) => {
                if e.is_unauthorized() {
                    self.force_logout();
                }
                let message = e.to_string();
                self.commit(|state| {
                    state.ui.loading = false;
                    state.ui.error = Some(message);
                });
            }
        }
        result
    }

    pub(crate) fn force_logout(&mut self) {
        warn!("Backend rejected the session token, signing out");
        self.end_session();
        self.commit(|state| {
            state.clear_user_data();
            state.ui.sign_in_required = true;
        });
    }

    pub(crate) fn end_session(&mut self) {
        self.client.set_token(None);
        if let Some(session) = &self.session {
            if let Err(e) = session.clear() {
                warn!("Could not remove session file {}: {}", session.path().display(), e);
            }
        }
    }
}
