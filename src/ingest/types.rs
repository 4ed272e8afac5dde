// src/ingest/types.rs
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Display name → URL.
pub type SourceMap = BTreeMap<String, String>;

/// How an item was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Rss,
    Html,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Rss => "RSS",
            Method::Html => "HTML",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedItem {
    pub source: String,
    pub title: String,
    pub summary: String, // empty for HTML items
    pub link: String,    // absolute URL
    pub published_at: Option<DateTime<Utc>>,
    pub method: Method,
}

impl CollectedItem {
    /// Stored form of the publish date: RFC 3339 in UTC, or empty.
    pub fn published_at_str(&self) -> String {
        self.published_at
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    }
}
