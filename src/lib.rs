// src/lib.rs
// Library surface shared by the binary and the integration tests.

pub mod config;
pub mod digest;
pub mod history;
pub mod ingest;
pub mod monitor;
pub mod notify;
pub mod relevance;

pub use crate::ingest::types::{CollectedItem, Method};
pub use crate::monitor::{collect_all, execute, prepare_notifier, run, RunOptions, RunReport};
pub use crate::notify::{EmailNotifier, Notifier};
