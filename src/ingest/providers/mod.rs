// src/ingest/providers/mod.rs
pub mod html;
pub mod rss;

pub use html::collect_html;
pub use rss::collect_rss;
