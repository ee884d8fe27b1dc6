use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::extractors::bearer_token,
    error::{ErrorBody, FailureReport},
    state::AppState,
};

/// A failure worth keeping after the response is gone.
#[derive(Debug, Clone)]
pub struct NewErrorLog {
    pub message: String,
    pub stack: Option<String>,
    pub status_code: i32,
    pub method: String,
    pub url: String,
    pub owner_id: Option<Uuid>,
}

#[async_trait]
pub trait ErrorLogStore: Send + Sync {
    async fn append(&self, entry: NewErrorLog) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgErrorLogStore {
    db: PgPool,
}

impl PgErrorLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ErrorLogStore for PgErrorLogStore {
    async fn append(&self, entry: NewErrorLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO error_logs (id, message, stack, status_code, method, url, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.message)
        .bind(&entry.stack)
        .bind(entry.status_code)
        .bind(&entry.method)
        .bind(&entry.url)
        .bind(entry.owner_id)
        .execute(&self.db)
        .await
        .context("insert error log")?;
        Ok(())
    }
}

/// Persist unexpected failures. Never alters the status or message the
/// caller receives; in development the error chain is added as `stack`.
pub async fn record_failures(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let url = req.uri().to_string();
    let owner_id = bearer_token(req.headers())
        .ok()
        .and_then(|token| state.keys.verify(token).ok())
        .map(|claims| claims.sub);

    let response = next.run(req).await;
    let Some(report) = response.extensions().get::<FailureReport>().cloned() else {
        return response;
    };

    let status = response.status();
    let entry = NewErrorLog {
        message: report.message,
        stack: Some(report.stack.clone()),
        status_code: i32::from(status.as_u16()),
        method,
        url,
        owner_id,
    };
    if let Err(e) = state.error_logs.append(entry).await {
        warn!(error = %e, "failed to persist error log");
    }

    if state.config.environment.exposes_stack() {
        let mut body = ErrorBody::new("Internal server error");
        body.stack = Some(report.stack);
        return (status, Json(body)).into_response();
    }
    response
}
