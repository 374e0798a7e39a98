//! # diary-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the storage port.

use actix_web::{error, web, HttpResponse};
use diary_core::{AppError, CreateEntryRequest, EntryId, EntryRepo, EntryStore, NewEntry};

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub store: EntryStore,
}

impl AppState {
    pub fn new(store: EntryStore) -> Self {
        Self { store }
    }
}

/// Every handler goes through here, so a store that never came up is
/// reported the same way by all of them.
fn ready_repo(state: &AppState) -> Result<&dyn EntryRepo, ApiError> {
    state.store.repo().map_err(|err| {
        log::error!("request rejected: {err}");
        ApiError(err)
    })
}

/// Logs the real cause and swaps it for a message safe to return.
fn storage_failure(
    context: &'static str,
    public: &'static str,
) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |err| {
        log::error!("{context}: {err:#}");
        ApiError(AppError::Internal(public.into()))
    }
}

/// `GET /api/entries`
pub async fn list_entries(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let repo = ready_repo(&state)?;
    let entries = repo
        .list_entries()
        .await
        .map_err(storage_failure("DB query error", "Failed to fetch diary entries"))?;

    Ok(HttpResponse::Ok().json(entries))
}

/// `POST /api/entries`
///
/// Input is validated before the store is consulted, so a bad request is a
/// 400 even while the database is down.
pub async fn create_entry(
    state: web::Data<AppState>,
    body: web::Json<CreateEntryRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_entry = NewEntry::parse(body.content.as_deref())?;

    let repo = ready_repo(&state)?;
    let entry = repo
        .create_entry(new_entry)
        .await
        .map_err(storage_failure("DB insert error", "Failed to save diary entry"))?;

    log::debug!("created diary entry {}", entry.id);
    Ok(HttpResponse::Created().json(entry))
}

/// `DELETE /api/entries/{id}`
///
/// Succeeds whether or not the id existed. An id that is not an integer
/// cannot name any row, so it succeeds without a query.
pub async fn delete_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();

    let repo = ready_repo(&state)?;
    let Ok(id) = raw_id.parse::<EntryId>() else {
        log::debug!("delete of non-numeric entry id {raw_id:?} matches nothing");
        return Ok(HttpResponse::NoContent().finish());
    };

    repo.delete_entry(id)
        .await
        .map_err(storage_failure("DB delete error", "Failed to delete diary entry"))?;

    Ok(HttpResponse::NoContent().finish())
}

/// Largest accepted JSON body.
pub const JSON_LIMIT: usize = 100 * 1024;

/// Oversized bodies are a 413. Other malformed bodies (not JSON, wrong
/// content type, `content` not a string) get the same answer as a missing
/// `content`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err: error::JsonPayloadError, _req| {
            log::debug!("rejected entry payload: {err}");
            let app_err = match err {
                error::JsonPayloadError::Overflow { .. }
                | error::JsonPayloadError::OverflowKnownLength { .. } => {
                    AppError::PayloadTooLarge("Request entity too large".into())
                }
                _ => AppError::Validation(NewEntry::REQUIRED_MESSAGE.into()),
            };
            ApiError(app_err).into()
        })
}
