use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    errors::ServiceError,
    services::alerts::AlertRecord,
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertQueryParams {
    /// Evaluation instant for the 30-day sale window; defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierDto {
    pub id: i32,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LowStockAlertDto {
    pub product_id: i32,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    /// Projected days until stockout; null when the window saw no usage
    pub days_until_stockout: Option<i64>,
    /// Primary supplier; null when no primary link exists
    pub supplier: Option<SupplierDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LowStockAlertsResponse {
    pub alerts: Vec<LowStockAlertDto>,
    pub total_alerts: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:company_id/alerts/low-stock", get(low_stock_alerts))
}

async fn low_stock_alerts(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
    Query(params): Query<AlertQueryParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let as_of = params.as_of.unwrap_or_else(Utc::now);
    let records = state
        .services
        .alerts
        .compute_low_stock_alerts(company_id, as_of)
        .await?;
    Ok(Json(project(records)))
}

/// Serialization boundary: flattens alert records into the wire contract and
/// wraps them with the total count.
fn project(records: Vec<AlertRecord>) -> LowStockAlertsResponse {
    let alerts: Vec<LowStockAlertDto> = records
        .into_iter()
        .map(|r| LowStockAlertDto {
            product_id: r.product_id,
            product_name: r.product_name,
            sku: r.sku,
            warehouse_id: r.warehouse_id,
            warehouse_name: r.warehouse_name,
            current_stock: r.current_stock,
            threshold: r.threshold,
            days_until_stockout: r.days_until_stockout,
            supplier: r.supplier.map(|s| SupplierDto {
                id: s.id,
                name: s.name,
                contact_email: s.contact_email,
            }),
        })
        .collect();
    let total_alerts = alerts.len();

    LowStockAlertsResponse {
        alerts,
        total_alerts,
    }
}
