pub mod alerts;
pub mod health;
pub mod products;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{alerts::LowStockAlertService, products::ProductStockService};

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductStockService>,
    pub alerts: Arc<LowStockAlertService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            products: Arc::new(ProductStockService::new(db.clone(), event_sender.clone())),
            alerts: Arc::new(LowStockAlertService::new(db, event_sender)),
        }
    }
}
