use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::info;

use crate::db::SchoolStore;
use crate::db::models::{DbNote, NewNote};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::filter::Predicate;
use crate::service::identity::authorize_teacher_write;
use crate::types::criteria::{blank_as_none, required};

#[derive(Debug, Default, Deserialize)]
pub struct NewNotePayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub files: Option<String>,
}

pub async fn create_note(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: NewNotePayload,
) -> Result<DbNote, SchoolError> {
    let title = required("title", payload.title)?;
    let content = required("content", payload.content)?;
    let subject = required("subject", payload.subject)?;
    let class = required("class", payload.class)?;
    let section = required("section", payload.section)?;

    let teacher = authorize_teacher_write(store, identity).await?;
    let note = store
        .insert_note(NewNote {
            title,
            content,
            subject,
            class,
            section,
            created_by: teacher.staff.id,
            files: payload.files,
            created_at: Utc::now(),
        })
        .await?;

    info!(note_id = note.id, staff_id = teacher.staff.id, "note created");
    Ok(note)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    /// Matched against the note body.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub given_by: Option<String>,
    /// Matched against the author's name.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub uploaded_by: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
}

#[derive(Debug, FromRow)]
struct NoteRow {
    title: String,
    content: String,
    uploaded_by: Option<String>,
    class: String,
    section: String,
    subject: String,
    files: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteView {
    pub title: String,
    pub given_by: String,
    pub uploaded_by: Option<String>,
    pub class: String,
    pub section: String,
    pub subject: String,
    pub files: Option<String>,
    /// `YYYY-MM-DD` part of the creation time.
    pub date: String,
}

impl From<NoteRow> for NoteView {
    fn from(row: NoteRow) -> Self {
        Self {
            title: row.title,
            given_by: row.content,
            uploaded_by: row.uploaded_by,
            class: row.class,
            section: row.section,
            subject: row.subject,
            files: row.files,
            date: row.created_at.date_naive().to_string(),
        }
    }
}

/// Notes, newest first.
pub async fn search_notes(
    store: &SchoolStore,
    criteria: NoteCriteria,
) -> Result<Vec<NoteView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        n.title AS title,
        n.content AS content,
        tu.name AS uploaded_by,
        n.class AS class,
        n.section AS section,
        n.subject AS subject,
        n.files AS files,
        n.created_at AS created_at
    FROM notes n
    LEFT JOIN teachers t ON n.created_by = t.id
    LEFT JOIN users tu ON t.user_id = tu.id"#,
    );
    Predicate::scoped("n")
        .contains("title", criteria.title.as_deref())
        .contains("content", criteria.given_by.as_deref())
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .contains("subject", criteria.subject.as_deref())
        .and(Predicate::scoped("tu").contains("name", criteria.uploaded_by.as_deref()))
        .push_where(&mut qb);
    qb.push(" ORDER BY n.created_at DESC, n.id DESC");

    let rows = qb
        .build_query_as::<NoteRow>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows.into_iter().map(NoteView::from).collect())
}
