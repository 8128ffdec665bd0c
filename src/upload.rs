use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{Catalog, DocType, NewRecord};

/// Declared content type a selected file must carry.
pub const PDF_MIME: &str = "application/pdf";

/// Message surfaced when anything else is picked.
pub const WRONG_FILE_ALERT: &str = "Please select a PDF file";

/// Simulated transfer time for a submission.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(2);

/// How long the success state stays up before the modal closes itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// The chosen file. Only the declared name and size are kept; the bytes are
/// never read or transferred.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileRef {
    pub name: String,
    pub size_bytes: u64,
}

impl FileRef {
    /// Size in binary megabytes, to one decimal place.
    pub fn size_mb(&self) -> String {
        format!("{:.1}", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Form state while the modal is open. Every field is required before a
/// submission can fire.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub title: String,
    pub author: String,
    pub doc_type: Option<DocType>,
    pub department: Option<String>,
    pub file: Option<FileRef>,
}

/// A draft with every required field present. The only way to obtain one is
/// [`Draft::ready`], which is what gates submission.
#[derive(Debug, Clone)]
pub struct ReadyDraft {
    pub title: String,
    pub author: String,
    pub doc_type: DocType,
    pub department: String,
    pub file: FileRef,
}

impl ReadyDraft {
    fn into_record(self) -> NewRecord {
        NewRecord {
            title: self.title,
            author: self.author,
            doc_type: self.doc_type,
            department: self.department,
            file_name: self.file.name,
        }
    }
}

impl Draft {
    pub fn ready(&self) -> Option<ReadyDraft> {
        if self.title.is_empty() || self.author.is_empty() {
            return None;
        }

        Some(ReadyDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            doc_type: self.doc_type?,
            department: self.department.clone()?,
            file: self.file.clone()?,
        })
    }

    /// Stores the picked file if its declared content type is PDF. Anything
    /// else is rejected, leaving the field unset so the caller can surface
    /// the alert.
    pub fn select_file(&mut self, name: String, content_type: &str, size_bytes: u64) -> bool {
        if content_type != PDF_MIME {
            debug!("Rejected {name}: declared type {content_type}");
            return false;
        }

        self.file = Some(FileRef { name, size_bytes });
        true
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Complete,
}

/// One open upload modal, from opening to close or cancellation.
#[derive(Debug)]
pub struct Workflow {
    pub id: Uuid,
    pub phase: Phase,
    pub draft: Draft,
    task: Option<JoinHandle<()>>,
}

/// Owner of the at-most-one live upload workflow.
#[derive(Debug, Default)]
pub struct Uploader {
    current: Option<Workflow>,
}

impl Uploader {
    /// Opens a fresh modal, discarding any previous workflow.
    pub fn open(&mut self) -> Uuid {
        self.teardown();

        let id = Uuid::new_v4();
        self.current = Some(Workflow {
            id,
            phase: Phase::Editing,
            draft: Draft::default(),
            task: None,
        });

        debug!("Upload workflow {id} opened");
        id
    }

    /// Cancels the workflow and aborts any pending delayed continuation, so
    /// nothing fires against a torn-down modal.
    pub fn teardown(&mut self) {
        if let Some(workflow) = self.current.take() {
            if let Some(task) = workflow.task {
                task.abort();
            }
            debug!("Upload workflow {} torn down", workflow.id);
        }
    }

    /// Drops the workflow without touching its task. Used by the delayed
    /// auto-close, which runs as that task.
    fn clear(&mut self) {
        self.current = None;
    }

    pub fn workflow(&self) -> Option<&Workflow> {
        self.current.as_ref()
    }

    pub fn workflow_mut(&mut self) -> Option<&mut Workflow> {
        self.current.as_mut()
    }
}

/// Fires the simulated transfer for the current workflow.
///
/// Returns `false` without touching anything when no modal is open, the
/// workflow is already past editing, or a required field is missing. On
/// success the workflow enters `Submitting` and the record lands in the
/// catalog once the transfer delay has elapsed.
pub async fn submit(uploader: &Arc<Mutex<Uploader>>, catalog: &Arc<RwLock<Catalog>>) -> bool {
    let mut guard = uploader.lock().await;

    let Some(workflow) = guard.workflow_mut() else {
        return false;
    };

    if workflow.phase != Phase::Editing {
        return false;
    }

    let Some(ready) = workflow.draft.ready() else {
        return false;
    };

    workflow.phase = Phase::Submitting;
    info!("Uploading {}", ready.file.name);

    let task = tokio::spawn(run_transfer(
        workflow.id,
        ready,
        Arc::clone(uploader),
        Arc::clone(catalog),
    ));
    workflow.task = Some(task);

    true
}

/// Delayed continuation of a submission. The workflow may have been torn
/// down while the delay was pending, so the same workflow must still be in
/// `Submitting` before any state is touched.
async fn run_transfer(
    id: Uuid,
    ready: ReadyDraft,
    uploader: Arc<Mutex<Uploader>>,
    catalog: Arc<RwLock<Catalog>>,
) {
    tokio::time::sleep(SUBMIT_DELAY).await;

    let mut guard = uploader.lock().await;
    let Some(workflow) = guard.workflow_mut() else {
        return;
    };
    if workflow.id != id || workflow.phase != Phase::Submitting {
        return;
    }

    let file_name = ready.file.name.clone();
    catalog.write().await.add(ready.into_record());
    info!("Upload of {file_name} complete");

    workflow.phase = Phase::Complete;
    workflow.task = Some(tokio::spawn(close_modal(id, Arc::clone(&uploader))));
}

/// Auto-closes the modal once the success state has been shown.
async fn close_modal(id: Uuid, uploader: Arc<Mutex<Uploader>>) {
    tokio::time::sleep(AUTO_CLOSE_DELAY).await;

    let mut guard = uploader.lock().await;
    let alive = matches!(
        guard.workflow(),
        Some(workflow) if workflow.id == id && workflow.phase == Phase::Complete
    );
    if alive {
        guard.clear();
        debug!("Upload workflow {id} closed");
    }
}
