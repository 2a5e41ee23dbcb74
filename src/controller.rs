//! Form state machine for a single search session.
//!
//! A controller owns the two form fields and the current [`UiState`].
//! Transitions are published on a [`watch`] channel so views can follow
//! the request while it is in flight.

use crate::search::SearchClient;
use crate::types::{ErrorState, SearchRequest, SearchResult};
use tokio::sync::watch;
use tracing::{debug, warn};

/// What the view should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(SearchResult),
    Failure(ErrorState),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            UiState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorState> {
        match self {
            UiState::Failure(error) => Some(error),
            _ => None,
        }
    }
}

/// Values typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub site: String,
    pub question: String,
}

impl SearchForm {
    /// The request to send, or `None` when either field is blank.
    pub fn to_request(&self) -> Option<SearchRequest> {
        let site = self.site.trim();
        let question = self.question.trim();
        if site.is_empty() || question.is_empty() {
            return None;
        }
        Some(SearchRequest {
            site: site.to_string(),
            question: question.to_string(),
        })
    }
}

pub struct SearchFormController {
    client: SearchClient,
    form: SearchForm,
    state: watch::Sender<UiState>,
}

impl SearchFormController {
    pub fn new(client: SearchClient) -> Self {
        let (state, _) = watch::channel(UiState::Idle);
        Self {
            client,
            form: SearchForm::default(),
            state,
        }
    }

    pub fn update_site(&mut self, value: impl Into<String>) {
        self.form.site = value.into();
    }

    pub fn update_question(&mut self, value: impl Into<String>) {
        self.form.question = value.into();
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that sees every transition, including `Loading`.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Submits the form. Returns `false` without touching state or the
    /// network when a field is blank. Both fields are trimmed before the
    /// blank check and the trimmed values are what gets sent.
    ///
    /// Takes `&mut self`, so a second submission cannot start until this one
    /// resolves. If the future is dropped mid-flight the state moves to
    /// `Failure` with [`CANCELLED_MESSAGE`].
    pub async fn submit(&mut self) -> bool {
        let Some(request) = self.form.to_request() else {
            debug!("Ignoring submit with blank site or question");
            return false;
        };

        // Replacing the state drops any previous result or error.
        self.state.send_replace(UiState::Loading);
        debug!("Submitting search for site {}", request.site);
        let guard = LoadingGuard::new(&self.state);

        let next = match self.client.search(&request).await {
            Ok(result) => UiState::Success(result),
            Err(e) => {
                warn!("Search failed: {}", e);
                UiState::Failure(ErrorState {
                    message: e.message().to_string(),
                })
            }
        };
        guard.disarm();
        self.state.send_replace(next);
        true
    }
}

/// Message stored when a submission is dropped before it resolves.
pub const CANCELLED_MESSAGE: &str = "Search cancelled";

/// Leaves `Loading` if the submit future is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<UiState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<UiState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let cancelled = self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = UiState::Failure(ErrorState {
                message: CANCELLED_MESSAGE.to_string(),
            });
            true
        });
        if cancelled {
            warn!("Search dropped before it resolved");
        }
    }
}
