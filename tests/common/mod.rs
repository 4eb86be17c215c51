#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;

use stockwatch_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{company, inventory, inventory_history, product_supplier, supplier, warehouse},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness spinning up application state backed by an in-memory
/// SQLite database with the real schema applied.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps the in-memory database alive and shared
        // across every statement in the test.
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to connect to in-memory database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), event_sender.clone());
        let state = AppState {
            db: db_arc,
            config: AppConfig::new("sqlite::memory:", "127.0.0.1", 0),
            event_sender,
            services,
        };

        Self {
            state,
            _event_task: event_task,
        }
    }

    pub fn router(&self) -> axum::Router {
        stockwatch_api::app_router(self.state.clone())
    }
}

pub async fn create_company(state: &AppState, name: &str) -> company::Model {
    company::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to insert company")
}

pub async fn create_warehouse(state: &AppState, company_id: i32, name: &str) -> warehouse::Model {
    warehouse::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to insert warehouse")
}

pub async fn create_supplier(
    state: &AppState,
    name: &str,
    contact_email: Option<&str>,
) -> supplier::Model {
    supplier::ActiveModel {
        name: Set(name.to_string()),
        contact_email: Set(contact_email.map(|e| e.to_string())),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to insert supplier")
}

pub async fn link_supplier(
    state: &AppState,
    product_id: i32,
    supplier_id: i32,
    is_primary: bool,
) -> product_supplier::Model {
    product_supplier::ActiveModel {
        product_id: Set(product_id),
        supplier_id: Set(supplier_id),
        is_primary: Set(is_primary),
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to link supplier")
}

/// Appends an audit row with an explicit timestamp, bypassing the
/// stamped-at-insert default.
pub async fn record_movement(
    state: &AppState,
    inventory_id: i32,
    change_amount: i32,
    created_at: DateTime<Utc>,
) -> inventory_history::Model {
    inventory_history::ActiveModel {
        inventory_id: Set(inventory_id),
        change_amount: Set(change_amount),
        reason: Set(Some("Sale".to_string())),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .expect("failed to insert inventory history")
}

/// Sets the current stock level directly, without touching history.
pub async fn set_quantity(state: &AppState, inventory_id: i32, quantity: i32) {
    use sea_orm::EntityTrait;

    let model = inventory::Entity::find_by_id(inventory_id)
        .one(state.db.as_ref())
        .await
        .expect("failed to load inventory")
        .expect("inventory row missing");

    let mut active: inventory::ActiveModel = model.into();
    active.quantity = Set(quantity);
    active
        .update(state.db.as_ref())
        .await
        .expect("failed to update inventory quantity");
}
