//! Health endpoint.
//!
//! Always `200`. The status turns `degraded` when the last sheet write
//! failed or the store does not answer a ping; the ledgers keep serving from
//! memory either way.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// `reachable` or `unreachable`.
    pub database: &'static str,
    pub stock_items: usize,
    pub invoices: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_persistence_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_persistence_error_at: Option<String>,
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.health().await;
    let degraded = snapshot.persistence.is_degraded() || !snapshot.database_reachable;

    Json(HealthResponse {
        status: if degraded { "degraded" } else { "ok" },
        database: if snapshot.database_reachable {
            "reachable"
        } else {
            "unreachable"
        },
        stock_items: snapshot.stock_items,
        invoices: snapshot.invoices,
        last_persistence_error: snapshot.persistence.last_error,
        last_persistence_error_at: snapshot.persistence.last_error_at.map(|at| at.to_rfc3339()),
    })
}
