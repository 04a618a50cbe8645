use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::chaincode::Ledger;
use crate::error::LedgerError;
use crate::state::KeyValueStore;

#[derive(Debug, Deserialize)]
pub struct InvocationRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

pub fn router<S>(ledger: Arc<Ledger<S>>) -> Router
where
    S: KeyValueStore + Send + Sync + 'static,
{
    Router::new()
        .route("/api/invoke", post(invoke::<S>))
        .route("/api/query", post(query::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}

pub async fn invoke<S>(
    State(ledger): State<Arc<Ledger<S>>>,
    Json(req): Json<InvocationRequest>,
) -> Result<StatusCode, (StatusCode, String)>
where
    S: KeyValueStore + Send + Sync + 'static,
{
    ledger
        .invoke(&req.function, &req.args)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(reject)
}

pub async fn query<S>(
    State(ledger): State<Arc<Ledger<S>>>,
    Json(req): Json<InvocationRequest>,
) -> Result<Response, (StatusCode, String)>
where
    S: KeyValueStore + Send + Sync + 'static,
{
    let body = ledger.query(&req.function, &req.args).map_err(reject)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn status_of(e: &LedgerError) -> StatusCode {
    match e {
        LedgerError::Argument { .. }
        | LedgerError::InvalidArgument(_)
        | LedgerError::Parse { .. }
        | LedgerError::UnknownOperation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Store(_) | LedgerError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(e: LedgerError) -> (StatusCode, String) {
    let status = status_of(&e);
    warn!(error = %e, status = status.as_u16(), "invocation rejected");
    (status, e.to_string())
}
