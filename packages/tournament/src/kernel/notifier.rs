use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::{BaseNotifier, Notification, NotificationVariant};

/// Notification sink for headless use: every toast becomes a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl BaseNotifier for TracingNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        match notification.variant {
            NotificationVariant::Destructive => warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            NotificationVariant::Default => info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
        Ok(())
    }
}
