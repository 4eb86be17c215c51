use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Query},
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::instrument;

use crate::{
    db::DbPool,
    entities::{
        company, inventory, inventory_history, product, product_supplier, supplier, warehouse,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Length of the trailing sale window, in days. Average daily usage divides
/// by this fixed length, not by the count of active days.
const SALE_WINDOW_DAYS: i64 = 30;

/// One low-stock alert: a below-threshold inventory row with demonstrated
/// recent demand.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub product_id: i32,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    pub days_until_stockout: Option<i64>,
    pub supplier: Option<SupplierInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierInfo {
    pub id: i32,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(FromQueryResult)]
struct WindowUsage {
    total: Option<i64>,
}

/// Read-only engine deriving low-stock alerts from the audit history
#[derive(Clone)]
pub struct LowStockAlertService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl LowStockAlertService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Computes the set of products below their reorder threshold with recent
    /// negative velocity, for every warehouse owned by `company_id`. Products
    /// that are low but dormant (no sale inside the window) are omitted.
    ///
    /// The sale window is half-open: `[as_of - 30 days, as_of)`.
    #[instrument(skip(self))]
    pub async fn compute_low_stock_alerts(
        &self,
        company_id: i32,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<AlertRecord>, ServiceError> {
        let db = self.db.as_ref();

        // Distinguishes "company with zero alerts" from "company does not exist"
        company::Entity::find_by_id(company_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("company {} does not exist", company_id))
            })?;

        let warehouses: HashMap<i32, warehouse::Model> = warehouse::Entity::find()
            .filter(warehouse::Column::CompanyId.eq(company_id))
            .all(db)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        if warehouses.is_empty() {
            self.emit_computed(company_id, 0).await;
            return Ok(Vec::new());
        }

        let window_start = as_of - Duration::days(SALE_WINDOW_DAYS);

        // Inventory rows with at least one negative movement inside the window
        let recently_active = Query::select()
            .column(inventory_history::Column::InventoryId)
            .from(inventory_history::Entity)
            .and_where(Expr::col(inventory_history::Column::ChangeAmount).lt(0))
            .and_where(Expr::col(inventory_history::Column::CreatedAt).gte(window_start))
            .and_where(Expr::col(inventory_history::Column::CreatedAt).lt(as_of))
            .distinct()
            .to_owned();

        let warehouse_ids: Vec<i32> = warehouses.keys().copied().collect();

        let candidates = inventory::Entity::find()
            .find_also_related(product::Entity)
            .filter(inventory::Column::WarehouseId.is_in(warehouse_ids))
            .filter(inventory::Column::Id.in_subquery(recently_active))
            .filter(
                Expr::col((inventory::Entity, inventory::Column::Quantity))
                    .lt(Expr::col((product::Entity, product::Column::ReorderThreshold))),
            )
            .all(db)
            .await?;

        let mut alerts = Vec::with_capacity(candidates.len());
        for (inventory_row, product_row) in candidates {
            // The product FK guarantees the related row exists
            let Some(product_row) = product_row else {
                continue;
            };
            let warehouse_row = warehouses.get(&inventory_row.warehouse_id).ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "warehouse {} missing from tenant scope",
                    inventory_row.warehouse_id
                ))
            })?;

            let total_usage = self
                .window_usage(db, inventory_row.id, window_start, as_of)
                .await?;
            let supplier = self.primary_supplier(db, product_row.id).await?;

            alerts.push(AlertRecord {
                product_id: product_row.id,
                product_name: product_row.name,
                sku: product_row.sku,
                warehouse_id: warehouse_row.id,
                warehouse_name: warehouse_row.name.clone(),
                current_stock: inventory_row.quantity,
                threshold: product_row.reorder_threshold,
                days_until_stockout: days_until_stockout(inventory_row.quantity, total_usage),
                supplier,
            });
        }

        // Most urgent first; unknown horizons sort last, product id breaks ties
        alerts.sort_by(|a, b| {
            let horizon = |r: &AlertRecord| r.days_until_stockout.unwrap_or(i64::MAX);
            horizon(a)
                .cmp(&horizon(b))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        self.emit_computed(company_id, alerts.len()).await;
        Ok(alerts)
    }

    /// Sum of stock removed inside the window, as a positive number.
    async fn window_usage(
        &self,
        db: &DatabaseConnection,
        inventory_id: i32,
        window_start: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> Result<i64, ServiceError> {
        let row = inventory_history::Entity::find()
            .select_only()
            .column_as(inventory_history::Column::ChangeAmount.sum(), "total")
            .filter(inventory_history::Column::InventoryId.eq(inventory_id))
            .filter(inventory_history::Column::ChangeAmount.lt(0))
            .filter(inventory_history::Column::CreatedAt.gte(window_start))
            .filter(inventory_history::Column::CreatedAt.lt(as_of))
            .into_model::<WindowUsage>()
            .one(db)
            .await?;

        Ok(row.and_then(|r| r.total).map(|sum| -sum).unwrap_or(0))
    }

    /// The supplier linked with `is_primary = true`, or None. Nothing stops
    /// the store from holding several primary links per product; the lowest
    /// supplier id wins to keep the result deterministic.
    async fn primary_supplier(
        &self,
        db: &DatabaseConnection,
        product_id: i32,
    ) -> Result<Option<SupplierInfo>, ServiceError> {
        let linked = product_supplier::Entity::find()
            .filter(product_supplier::Column::ProductId.eq(product_id))
            .filter(product_supplier::Column::IsPrimary.eq(true))
            .order_by_asc(product_supplier::Column::SupplierId)
            .find_also_related(supplier::Entity)
            .one(db)
            .await?;

        Ok(linked.and_then(|(_, s)| s).map(|s| SupplierInfo {
            id: s.id,
            name: s.name,
            contact_email: s.contact_email,
        }))
    }

    async fn emit_computed(&self, company_id: i32, total_alerts: usize) {
        self.event_sender
            .send_or_log(Event::LowStockAlertsComputed {
                company_id,
                total_alerts,
            })
            .await;
    }
}

/// floor(quantity / average daily usage over the window); None when the
/// window saw no usage, so the division is never taken with a zero divisor.
fn days_until_stockout(quantity: i32, total_usage: i64) -> Option<i64> {
    if total_usage <= 0 {
        return None;
    }
    let avg_daily_usage = Decimal::from(total_usage) / Decimal::from(SALE_WINDOW_DAYS);
    (Decimal::from(quantity) / avg_daily_usage).floor().to_i64()
}
