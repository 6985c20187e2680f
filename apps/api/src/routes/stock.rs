//! Stock endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use stockbill_core::validation::{build_stock_item, coerce_bulk_item};
use stockbill_core::{today_iso, BulkStockRequest, CoreError, NewStockItem, StockItem, StockSummary};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/stock`
pub async fn list_stock(State(state): State<AppState>) -> Json<Vec<StockItem>> {
    Json(state.stock().await)
}

/// `GET /api/stock/summary`
pub async fn stock_summary(State(state): State<AppState>) -> Json<StockSummary> {
    Json(state.stock_summary().await)
}

/// `POST /api/stock`
///
/// `serialNo`, `brand`, `model` and `salePrice` are required. Everything
/// else is defaulted.
pub async fn add_stock(
    State(state): State<AppState>,
    payload: Result<Json<NewStockItem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockItem>)> {
    let Json(form) = payload?;
    let item = build_stock_item(form, &today_iso()).map_err(CoreError::from)?;
    let added = state.add_stock(item).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// `POST /api/stock/bulk`
///
/// Rows without a serial number or with a sale price of zero are dropped
/// silently, as spreadsheet imports usually carry a few. The rest is added
/// all or nothing.
pub async fn add_stock_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkStockRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<StockItem>>)> {
    let Json(request) = payload?;
    let rows = match request.items {
        Some(rows) if !rows.is_empty() => rows,
        _ => return Err(ApiError::InvalidItems),
    };

    let today = today_iso();
    let submitted = rows.len();
    let items: Vec<StockItem> = rows
        .into_iter()
        .filter_map(|row| coerce_bulk_item(row, &today))
        .collect();
    if items.len() < submitted {
        debug!(submitted, kept = items.len(), "Dropped unusable import rows");
    }

    let added = state.add_stock_bulk(items).await?;
    Ok((StatusCode::CREATED, Json(added)))
}
