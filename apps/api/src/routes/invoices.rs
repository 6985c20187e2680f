//! Invoice endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use stockbill_core::{today_iso, CreateInvoiceRequest, Invoice, PrintableInvoice};

use crate::error::{ApiError, ApiResult};
use crate::print::InvoicePage;
use crate::state::AppState;

/// `GET /api/invoices`
pub async fn list_invoices(State(state): State<AppState>) -> Json<Vec<Invoice>> {
    Json(state.invoices().await)
}

/// `POST /api/invoices`
///
/// Answers `200`, not `201`, which existing clients expect.
pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> ApiResult<Json<Invoice>> {
    let Json(request) = payload?;
    let invoice = state.create_invoice(&request, &today_iso()).await?;
    Ok(Json(invoice))
}

/// `GET /api/invoices/{invoice_no}`
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_no): Path<String>,
) -> ApiResult<Json<Invoice>> {
    state
        .find_invoice(&invoice_no)
        .await
        .map(Json)
        .ok_or(ApiError::InvoiceNotFound(invoice_no))
}

/// `GET /api/invoices/{invoice_no}/print`
pub async fn print_invoice(
    State(state): State<AppState>,
    Path(invoice_no): Path<String>,
) -> ApiResult<InvoicePage> {
    let invoice = state
        .find_invoice(&invoice_no)
        .await
        .ok_or(ApiError::InvoiceNotFound(invoice_no))?;

    let printable = PrintableInvoice::prepare(&invoice, state.company()).map_err(ApiError::Render)?;
    Ok(printable.into())
}
