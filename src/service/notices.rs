use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;

use crate::db::SchoolStore;
use crate::db::models::{DbNotice, NewNotice};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::identity::resolve_claimed_principal;
use crate::types::criteria::blank_as_none;
use crate::types::role::Role;

#[derive(Debug, Default, Deserialize)]
pub struct NewNoticePayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub target_role: Option<String>,
}

/// Post a notice as any principal the headers resolve to.
pub async fn add_notice(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: NewNoticePayload,
) -> Result<DbNotice, SchoolError> {
    if identity.name.is_none() || identity.role.is_none() {
        return Err(SchoolError::validation(
            "User type and name must be provided in headers.",
        ));
    }
    let (Some(title), Some(content), Some(target_role)) =
        (payload.title, payload.content, payload.target_role)
    else {
        return Err(SchoolError::validation(
            "Title, content and target role are required.",
        ));
    };
    let target_role = Role::from_claim(&target_role)?;

    let principal = resolve_claimed_principal(store, identity).await?;
    let notice = store
        .insert_notice(NewNotice {
            title,
            content,
            target_role,
            created_by: principal.id,
            created_at: Utc::now(),
        })
        .await?;

    info!(
        notice_id = notice.id,
        principal_id = principal.id,
        target_role = %notice.target_role,
        "notice posted"
    );
    Ok(notice)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct NoticeView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target_role: Role,
    pub created_at: DateTime<Utc>,
    pub created_by_name: Option<String>,
    pub created_by_role: Option<Role>,
}

/// All notices with their creator, newest first.
pub async fn list_notices(store: &SchoolStore) -> Result<Vec<NoticeView>, SchoolError> {
    let rows = sqlx::query_as::<_, NoticeView>(
        r#"
        SELECT
            n.id AS id,
            n.title AS title,
            n.content AS content,
            n.target_role AS target_role,
            n.created_at AS created_at,
            u.name AS created_by_name,
            u.role AS created_by_role
        FROM notices n
        LEFT JOIN users u ON n.created_by = u.id
        ORDER BY n.created_at DESC, n.id DESC
        "#,
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}
