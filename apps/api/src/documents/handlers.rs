//! Handlers for the generated-document endpoints: index, download, delete,
//! regenerate, bulk regenerate, and render status.
//!
//! Every handler that accepts a filename runs it through
//! `is_valid_document_filename` first — the input must equal its own
//! basename and end in the document extension.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::documents::{
    document_filename, is_valid_document_filename, list_documents, DocumentDescriptor,
    DOCUMENT_MIME,
};
use crate::errors::AppError;
use crate::models::product::ProductRecord;
use crate::render::{spawn_render, RenderStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateDocumentRequest {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDocumentRequest {
    pub filename: String,
}

fn validate_filename(input: &str) -> Result<(), AppError> {
    if is_valid_document_filename(input) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid document filename: '{input}'"
        )))
    }
}

/// Finds the stored record whose title maps to `filename`. The
/// title-to-filename mapping is lossy, so the comparison cleans the stored
/// titles rather than reversing the filename. Titles match the store's
/// case-insensitive key semantics, so casing differences don't hide a record.
fn find_record_for_filename(
    state: &AppState,
    filename: &str,
) -> Result<Option<ProductRecord>, AppError> {
    Ok(state
        .store
        .list_all()?
        .into_iter()
        .find(|r| document_filename(&r.title).eq_ignore_ascii_case(filename)))
}

/// GET /api/list-documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentDescriptor>>, AppError> {
    let documents = list_documents(&state.config.documents_dir)
        .context("failed to scan document directory")?;
    Ok(Json(documents))
}

/// GET /api/download-document?file=<filename>
pub async fn handle_download_document(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Response, AppError> {
    validate_filename(&query.file)?;
    let path = state.config.documents_dir.join(&query.file);

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "document '{}' does not exist",
                query.file
            )))
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    let headers = [
        (header::CONTENT_TYPE, DOCUMENT_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", query.file),
        ),
    ];
    // Streamed, not buffered: documents go out chunk by chunk.
    let body = Body::from_stream(ReaderStream::new(file));
    Ok((headers, body).into_response())
}

/// POST /api/regenerate-document
pub async fn handle_regenerate_document(
    State(state): State<AppState>,
    Json(req): Json<RegenerateDocumentRequest>,
) -> Result<Json<Value>, AppError> {
    validate_filename(&req.filename)?;

    let record = find_record_for_filename(&state, &req.filename)?.ok_or_else(|| {
        AppError::NotFound(format!("no product record matches '{}'", req.filename))
    })?;

    info!("regenerating document for '{}'", record.title);
    spawn_render(
        record,
        state.config.documents_dir.clone(),
        state.render_tracker.clone(),
    );

    Ok(Json(json!({ "success": true, "filename": req.filename })))
}

/// DELETE /api/delete-document
///
/// Removes the document file, then the JSON record; either side being
/// already gone is not a failure. The two removals are not transactional.
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Json(req): Json<DeleteDocumentRequest>,
) -> Result<Json<Value>, AppError> {
    validate_filename(&req.filename)?;

    let path = state.config.documents_dir.join(&req.filename);
    let file_removed = match std::fs::remove_file(&path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    let record_removed = match find_record_for_filename(&state, &req.filename)? {
        Some(record) => state.store.remove_by_title(&record.title)?,
        None => false,
    };

    info!(
        "deleted '{}': file_removed={file_removed}, record_removed={record_removed}",
        req.filename
    );

    Ok(Json(json!({
        "success": true,
        "fileRemoved": file_removed,
        "recordRemoved": record_removed,
    })))
}

/// POST /api/generate-all-documents
pub async fn handle_generate_all_documents(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let records = state.store.list_all()?;
    let initiated = records.len();
    for record in records {
        spawn_render(
            record,
            state.config.documents_dir.clone(),
            state.render_tracker.clone(),
        );
    }
    info!("initiated render of {initiated} documents");
    Ok(Json(json!({ "success": true, "initiated": initiated })))
}

/// GET /api/render-status?file=<filename>
///
/// Detached renders report nothing on the request that started them; this
/// is the poll path. Documents rendered before this process started show as
/// completed via the on-disk fallback.
pub async fn handle_render_status(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<Value>, AppError> {
    validate_filename(&query.file)?;

    let status = match state.render_tracker.get(&query.file) {
        Some(status) => status,
        None if state.config.documents_dir.join(&query.file).exists() => RenderStatus::Completed,
        None => {
            return Err(AppError::NotFound(format!(
                "no render known for '{}'",
                query.file
            )))
        }
    };

    Ok(Json(json!({ "filename": query.file, "render": status })))
}
