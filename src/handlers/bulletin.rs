//! Notes and notices.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::middleware::{ActingIdentity, JsonBody};
use crate::service::notes::{self, NewNotePayload, NoteCriteria, NoteView};
use crate::service::notices::{self, NewNoticePayload, NoticeView};
use crate::{SchoolError, server::router::SchoolState};

pub async fn create_note_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<NewNotePayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let note = notes::create_note(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Note created successfully", "note": note })),
    ))
}

pub async fn search_notes_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<NoteCriteria>,
) -> Result<Json<Vec<NoteView>>, SchoolError> {
    Ok(Json(notes::search_notes(&state.store, criteria).await?))
}

pub async fn add_notice_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<NewNoticePayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    notices::add_notice(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Notice added successfully." })),
    ))
}

pub async fn list_notices_handler(
    State(state): State<SchoolState>,
) -> Result<Json<Vec<NoticeView>>, SchoolError> {
    Ok(Json(notices::list_notices(&state.store).await?))
}
