use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the services after durable state changes or notable
/// read-side computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated {
        product_id: i32,
    },
    InitialStockRecorded {
        product_id: i32,
        warehouse_id: i32,
        quantity: i32,
    },
    LowStockAlertsComputed {
        company_id: i32,
        total_alerts: usize,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Event delivery is best effort and never blocks a committed write.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(?event, error = %e, "event channel closed, dropping event");
        }
    }
}

/// Drains the event channel, logging each event. Spawned once at startup;
/// runs until every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ProductCreated { product_id } => {
                info!(product_id, "product created");
            }
            Event::InitialStockRecorded {
                product_id,
                warehouse_id,
                quantity,
            } => {
                info!(product_id, warehouse_id, quantity, "initial stock recorded");
            }
            Event::LowStockAlertsComputed {
                company_id,
                total_alerts,
            } => {
                info!(company_id, total_alerts, "low stock alerts computed");
            }
        }
    }
}
