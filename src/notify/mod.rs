// src/notify/mod.rs
pub mod email;

pub use email::EmailNotifier;

use anyhow::Result;

/// Delivery channel for the finished digest. Failures are fatal for the run.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
