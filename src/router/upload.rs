use axum::{
    extract::State,
    http::header::HeaderName,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    catalog::DocType,
    error::AthenaeumError,
    state::Portal,
    upload::{self, Draft, Phase, WRONG_FILE_ALERT},
};

pub(super) fn upload_router() -> Router<Portal> {
    Router::new()
        .route("/upload/open", post(open))
        .route("/upload/cancel", post(cancel))
        .route("/upload/file", post(select_file))
        .route("/upload/clear-file", post(clear_file))
        .route("/upload/submit", post(submit))
        .route("/upload/state", get(poll_state))
}

/// Metadata fields the modal posts along with every workflow request, so the
/// draft survives fragment re-renders.
#[derive(Debug, Deserialize)]
struct DraftForm {
    #[serde(default)]
    title: String,

    #[serde(default)]
    author: String,

    #[serde(default, rename = "type")]
    doc_type: String,

    #[serde(default)]
    department: String,
}

impl DraftForm {
    fn apply(self, draft: &mut Draft) {
        draft.title = self.title;
        draft.author = self.author;
        draft.doc_type = DocType::parse(&self.doc_type);
        draft.department = (!self.department.is_empty()).then_some(self.department);
    }
}

/// [`DraftForm`] plus what the browser declares about the picked file. Only
/// the name, content type and size ever leave the file input.
#[derive(Debug, Deserialize)]
struct FileForm {
    #[serde(default)]
    title: String,

    #[serde(default)]
    author: String,

    #[serde(default, rename = "type")]
    doc_type: String,

    #[serde(default)]
    department: String,

    #[serde(default)]
    file_name: String,

    #[serde(default)]
    content_type: String,

    #[serde(default)]
    size_bytes: String,
}

impl FileForm {
    fn split(self) -> (DraftForm, String, String, u64) {
        let size = self.size_bytes.parse().unwrap_or(0);
        (
            DraftForm {
                title: self.title,
                author: self.author,
                doc_type: self.doc_type,
                department: self.department,
            },
            self.file_name,
            self.content_type,
            size,
        )
    }
}

async fn open(State(state): State<Portal>) -> Result<Html<String>, AthenaeumError> {
    state.uploader.lock().await.open();
    Ok(Html(state.render_upload_modal().await?))
}

/// Explicit cancellation or backdrop dismissal. Discards the draft and any
/// pending continuation.
async fn cancel(State(state): State<Portal>) -> Html<String> {
    state.uploader.lock().await.teardown();
    Html(String::new())
}

async fn select_file(
    State(state): State<Portal>,
    Form(form): Form<FileForm>,
) -> Result<Response, AthenaeumError> {
    let (fields, file_name, content_type, size_bytes) = form.split();

    let accepted = {
        let mut uploader = state.uploader.lock().await;
        match uploader.workflow_mut() {
            Some(workflow) => {
                fields.apply(&mut workflow.draft);
                workflow
                    .draft
                    .select_file(file_name, &content_type, size_bytes)
            }
            None => return Ok(Html(String::new()).into_response()),
        }
    };

    let body = Html(state.render_upload_modal().await?);
    if accepted {
        return Ok(body.into_response());
    }

    let alert = serde_json::json!({ "portal-alert": WRONG_FILE_ALERT }).to_string();
    Ok(([(HeaderName::from_static("hx-trigger"), alert)], body).into_response())
}

async fn clear_file(
    State(state): State<Portal>,
    Form(form): Form<DraftForm>,
) -> Result<Html<String>, AthenaeumError> {
    {
        let mut uploader = state.uploader.lock().await;
        if let Some(workflow) = uploader.workflow_mut() {
            form.apply(&mut workflow.draft);
            workflow.draft.clear_file();
        }
    }

    Ok(Html(state.render_upload_modal().await?))
}

async fn submit(
    State(state): State<Portal>,
    Form(form): Form<DraftForm>,
) -> Result<Html<String>, AthenaeumError> {
    {
        let mut uploader = state.uploader.lock().await;
        if let Some(workflow) = uploader.workflow_mut() {
            if workflow.phase == Phase::Editing {
                form.apply(&mut workflow.draft);
            }
        }
    }

    upload::submit(&state.uploader, &state.catalog).await;
    Ok(Html(state.render_upload_modal().await?))
}

async fn poll_state(State(state): State<Portal>) -> Result<Response, AthenaeumError> {
    if state.uploader.lock().await.workflow().is_none() {
        // Modal already closed itself; refresh so the new record shows up.
        return Ok((
            [(HeaderName::from_static("hx-refresh"), "true")],
            Html(String::new()),
        )
            .into_response());
    }

    Ok(Html(state.render_upload_modal().await?).into_response())
}
