use crate::config::Config;
use crate::controller::{SearchForm, SearchFormController, UiState};
use crate::search::SearchClient;
use crate::{render, AppState};
use axum::{
    extract::State,
    response::{Html, Json},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Fields posted by the search form. Missing fields count as blank.
#[derive(Debug, Deserialize, Default)]
pub struct SearchFormInput {
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub question: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit_form))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let search = SearchClient::with_timeout(&config.api_url, config.timeout)?;
    info!("Search service endpoint: {}", search.endpoint());

    let app = router(Arc::new(AppState::new(search)));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Site search listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "site-search",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn form_page() -> Html<String> {
    Html(render::render_page(&SearchForm::default(), &UiState::Idle))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(input): Form<SearchFormInput>,
) -> Html<String> {
    // One controller per posted form.
    let mut controller = SearchFormController::new(state.search.clone());
    controller.update_site(input.site);
    controller.update_question(input.question);

    if !controller.submit().await {
        info!("Form posted with a blank field, re-rendering");
    }

    Html(render::render_page(controller.form(), &controller.state()))
}
