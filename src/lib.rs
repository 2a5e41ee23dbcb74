pub mod config;
pub mod controller;
pub mod render;
pub mod search;
pub mod server;
pub mod types;

pub use controller::{SearchForm, SearchFormController, UiState, CANCELLED_MESSAGE};
pub use search::{SearchClient, SearchError};
pub use types::*;

/// Shared by every request of the web front end.
#[derive(Clone, Debug)]
pub struct AppState {
    pub search: SearchClient,
}

impl AppState {
    pub fn new(search: SearchClient) -> Self {
        Self { search }
    }
}
