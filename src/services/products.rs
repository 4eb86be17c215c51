use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{info, instrument};

use crate::{
    db::{self, DbPool},
    entities::{inventory, inventory_history, product, warehouse},
    errors::ServiceError,
    events::{Event, EventSender},
    money, sku,
};

/// Reorder threshold applied when the caller does not supply one
const DEFAULT_REORDER_THRESHOLD: i32 = 10;

/// Audit reason recorded for the stock a product starts with
const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Input for creating a product together with its first stock record.
/// `price` carries the raw decimal text; it is quantized before any store
/// access.
#[derive(Debug, Clone)]
pub struct CreateProductWithStock {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub reorder_threshold: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub initial_quantity: Option<i32>,
}

/// Service owning the product-with-stock creation transaction
#[derive(Clone)]
pub struct ProductStockService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProductStockService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Atomically creates a product, an optional inventory row for the given
    /// warehouse, and an optional audit entry for the initial quantity.
    /// Either all three rows commit or none do.
    #[instrument(skip(self))]
    pub async fn create_product_with_stock(
        &self,
        input: CreateProductWithStock,
    ) -> Result<i32, ServiceError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput(
                "name must not be empty".to_string(),
            ));
        }

        let normalized_sku = sku::normalize_sku(&input.sku)?;
        let price = money::quantize_price(&input.price)?;

        let reorder_threshold = input.reorder_threshold.unwrap_or(DEFAULT_REORDER_THRESHOLD);
        if reorder_threshold < 0 {
            return Err(ServiceError::InvalidInput(format!(
                "reorder_threshold must be non-negative, got {}",
                reorder_threshold
            )));
        }

        if input.initial_quantity.is_some() && input.warehouse_id.is_none() {
            return Err(ServiceError::InvalidInput(
                "initial_quantity requires a warehouse_id".to_string(),
            ));
        }
        let initial_quantity = input.initial_quantity.unwrap_or(0);
        if initial_quantity < 0 {
            return Err(ServiceError::InvalidInput(format!(
                "initial_quantity must be a non-negative integer, got {}",
                initial_quantity
            )));
        }

        let db = self.db.as_ref();

        // Checked before the write transaction to avoid a doomed rollback;
        // the FK constraint re-verifies inside it as the final authority.
        if let Some(warehouse_id) = input.warehouse_id {
            if warehouse::Entity::find_by_id(warehouse_id)
                .one(db)
                .await?
                .is_none()
            {
                return Err(ServiceError::NotFound(format!(
                    "warehouse {} does not exist",
                    warehouse_id
                )));
            }
        }

        // Fast path only; the unique constraint decides races at commit time.
        let existing = product::Entity::find()
            .filter(product::Column::Sku.eq(normalized_sku.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU {} already exists",
                normalized_sku
            )));
        }

        let warehouse_id = input.warehouse_id;
        let sku_for_txn = normalized_sku.clone();
        let product_id = db::transaction::<_, i32, ServiceError>(db, move |txn| {
            Box::pin(async move {
                let product = product::ActiveModel {
                    name: Set(name),
                    sku: Set(sku_for_txn.clone()),
                    price: Set(price),
                    reorder_threshold: Set(reorder_threshold),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(|e| product_insert_error(e, &sku_for_txn))?;

                if let Some(warehouse_id) = warehouse_id {
                    let inventory_row = inventory::ActiveModel {
                        product_id: Set(product.id),
                        warehouse_id: Set(warehouse_id),
                        quantity: Set(initial_quantity),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| inventory_insert_error(e, product.id, warehouse_id))?;

                    if initial_quantity > 0 {
                        inventory_history::ActiveModel {
                            inventory_id: Set(inventory_row.id),
                            change_amount: Set(initial_quantity),
                            reason: Set(Some(INITIAL_STOCK_REASON.to_string())),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                    }
                }

                Ok(product.id)
            })
        })
        .await?;

        self.event_sender
            .send_or_log(Event::ProductCreated { product_id })
            .await;
        if let Some(warehouse_id) = warehouse_id {
            if initial_quantity > 0 {
                self.event_sender
                    .send_or_log(Event::InitialStockRecorded {
                        product_id,
                        warehouse_id,
                        quantity: initial_quantity,
                    })
                    .await;
            }
        }

        info!(product_id, sku = %normalized_sku, "created product");
        Ok(product_id)
    }
}

/// A unique violation here means a concurrent insert of the same normalized
/// SKU won the race; the constraint, not the pre-check, is authoritative.
fn product_insert_error(e: DbErr, sku: &str) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict(format!("SKU {} already exists", sku))
        }
        _ => ServiceError::DatabaseError(e),
    }
}

/// The warehouse was pre-checked, but the FK inside the transaction has the
/// final word; a unique violation on the (product, warehouse) pair means a
/// concurrent writer created the same inventory row.
fn inventory_insert_error(e: DbErr, product_id: i32, warehouse_id: i32) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(format!(
            "inventory for product {} in warehouse {} already exists",
            product_id, warehouse_id
        )),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::NotFound(format!("warehouse {} does not exist", warehouse_id))
        }
        _ => ServiceError::DatabaseError(e),
    }
}
