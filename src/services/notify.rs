use crate::services::pocketbase::{PocketBaseClient, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;

/// Queues (user, type, payload) notifications for downstream delivery.
///
/// Delivery channels (email, push, in-app) are decided by whoever consumes
/// the notifications collection; this service only records the intent.
pub struct Notifier {
    store: Arc<PocketBaseClient>,
}

impl Notifier {
    pub fn new(store: Arc<PocketBaseClient>) -> Self {
        Self { store }
    }

    pub async fn send(
        &self,
        user_id: &str,
        notification_type: &str,
        payload: Value,
    ) -> Result<(), StoreError> {
        let collection = self.store.collections().notifications.clone();
        let record = json!({
            "user": user_id,
            "type": notification_type,
            "data": payload,
            "read": false,
            "created": chrono::Utc::now().to_rfc3339(),
        });

        self.store.create_record(&collection, &record).await?;

        tracing::info!(
            user_id,
            notification_type,
            "notification queued for delivery"
        );
        Ok(())
    }
}
