//! # stockbill API
//!
//! JSON over HTTP for serialized stock and GST invoices.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Web UI ───► HTTP (5000) ───► routes ───► AppState ───► stockbill-db   │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                       stockbill-core                    │
//! │                                    (StockLedger, InvoiceLedger)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` wires configuration, the database and shutdown;
//! everything testable lives here.

pub mod config;
pub mod error;
pub mod print;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, HealthSnapshot, Ledgers};

/// The full application router.
pub fn router(state: AppState) -> Router {
    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
