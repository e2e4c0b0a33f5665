use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

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
}

// Domain events emitted after successful writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ClientCreated(Uuid),
    ClientUpdated(Uuid),
    ClientDeleted(Uuid),
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    VendorDeleted(Uuid),
    VendorPincodeAdded { vendor_id: Uuid, pincode: String },
    VendorPincodeRemoved { vendor_id: Uuid, pincode: String },
    ZoneCreated(Uuid),
    RateMasterCreated { rate_id: Uuid, client_id: Uuid },
    RateMasterUpdated { rate_id: Uuid, client_id: Uuid },
    ShipmentCreated(Uuid),
    ShipmentUpdated(Uuid),
    ShipmentDeleted(Uuid),
    BillGenerated {
        bill_id: Uuid,
        client_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    },
}

/// Consumes the event channel and logs each event. Integrations hang off
/// this loop; today logging is the only consumer.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BillGenerated {
                bill_id,
                client_id,
                period_start,
                period_end,
            } => {
                info!(
                    bill_id = %bill_id,
                    client_id = %client_id,
                    period_start = %period_start,
                    period_end = %period_end,
                    "Bill generated"
                );
            }
            other => info!("Received event: {:?}", other),
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_events() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ShipmentCreated(Uuid::nil()))
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::ShipmentCreated(id)) => assert_eq!(id, Uuid::nil()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_drops() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender.send(Event::ZoneCreated(Uuid::nil())).await.is_err());
    }
}
