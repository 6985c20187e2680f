//! HTTP routes.
//!
//! ```text
//! GET  /api/health
//! GET  /api/stock                          POST /api/stock
//! GET  /api/stock/summary                  POST /api/stock/bulk
//! GET  /api/invoices                       POST /api/invoices
//! GET  /api/invoices/{invoice_no}
//! GET  /api/invoices/{invoice_no}/print    (HTML)
//! ```

pub mod health;
pub mod invoices;
pub mod stock;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/stock", get(stock::list_stock).post(stock::add_stock))
        .route("/api/stock/summary", get(stock::stock_summary))
        .route("/api/stock/bulk", post(stock::add_stock_bulk))
        .route(
            "/api/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/api/invoices/{invoice_no}", get(invoices::get_invoice))
        .route("/api/invoices/{invoice_no}/print", get(invoices::print_invoice))
}
