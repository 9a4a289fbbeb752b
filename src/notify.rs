//! Outbound notification collaborator

use async_trait::async_trait;
use tracing::info;

/// Fire-and-forget notification delivery (invoice emails, courier pings).
/// Implementations log failures themselves; business flows never see them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str);
}

/// Demo notifier that writes deliveries to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) {
        info!(recipient, subject, body, "notification sent");
    }
}
