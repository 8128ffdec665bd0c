use crate::{
    error::AthenaeumError,
    session::LOGIN_DELAY,
    state::{Page, Portal},
};
use axum::{
    extract::{Path, Query, State},
    http::{header::HeaderName, Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_macros::debug_handler;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use self::upload::upload_router;

mod upload;

pub fn router(state: Portal) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .nest_service("/public", ServeDir::new("public"))
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/page/:page", get(page))
        .route("/library/results", get(library_results))
        .route("/download/:id", get(download))
        .route("/theme", post(toggle_theme))
        .merge(upload_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[debug_handler]
pub async fn index(State(state): State<Portal>) -> Result<Html<String>, AthenaeumError> {
    Ok(Html(state.render_index().await?))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    user_id: String,
}

/// Accepts the student id after a simulated auth round trip. Blank ids are
/// silently ignored and the login page shows again.
async fn login(
    State(state): State<Portal>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AthenaeumError> {
    tokio::time::sleep(LOGIN_DELAY).await;

    state.session.write().await.login(&form.user_id);

    Ok((
        StatusCode::OK,
        [(HeaderName::from_static("hx-redirect"), "/")],
    )
        .into_response())
}

async fn logout(State(state): State<Portal>) -> Redirect {
    state.session.write().await.logout();
    state.nav.write().await.page = Page::default();
    state.uploader.lock().await.teardown();
    Redirect::to("/")
}

async fn page(
    State(state): State<Portal>,
    Path(page): Path<String>,
) -> Result<Redirect, AthenaeumError> {
    let Some(page) = Page::parse(&page) else {
        return Err(AthenaeumError::NotFound(page));
    };

    if state.session.read().await.is_logged_in() {
        state.nav.write().await.page = page;
    }

    Ok(Redirect::to("/"))
}

fn default_all() -> String {
    crate::catalog::FILTER_ALL.to_string()
}

#[derive(Debug, Deserialize)]
struct LibraryQuery {
    #[serde(default)]
    q: String,

    #[serde(default = "default_all")]
    department: String,

    #[serde(default = "default_all", rename = "type")]
    doc_type: String,
}

async fn library_results(
    State(state): State<Portal>,
    Query(params): Query<LibraryQuery>,
) -> Result<Html<String>, AthenaeumError> {
    Ok(Html(
        state
            .render_library_results(&params.q, &params.department, &params.doc_type)
            .await?,
    ))
}

async fn download(
    State(state): State<Portal>,
    Path(id): Path<String>,
) -> Result<StatusCode, AthenaeumError> {
    let catalog = state.catalog.read().await;
    let Some(record) = catalog.records().iter().find(|record| record.id == id) else {
        return Err(AthenaeumError::NotFound(id));
    };

    // Simulated download, nothing is actually transferred.
    info!("Downloading {}", record.file_name);
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_theme(State(state): State<Portal>) -> Redirect {
    let mut nav = state.nav.write().await;
    nav.theme = nav.theme.toggled();
    Redirect::to("/")
}
