// src/ingest/mod.rs
pub mod dates;
pub mod fetch;
pub mod providers;
pub mod sources;
pub mod types;

use crate::ingest::types::CollectedItem;
use metrics::{describe_counter, Unit};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::HashSet;

/// One-time counter registration so series show up once a recorder is installed.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "editais_fetch_errors_total",
            Unit::Count,
            "Failed GETs (network, status, empty body)."
        );
        describe_counter!(
            "editais_source_errors_total",
            Unit::Count,
            "Sources that yielded nothing because of a fetch or parse failure."
        );
        describe_counter!(
            "editais_entries_total",
            Unit::Count,
            "Feed entries / anchors seen before filtering."
        );
        describe_counter!(
            "editais_kept_total",
            Unit::Count,
            "Items kept after recency + keyword gates."
        );
        describe_counter!(
            "editais_filtered_total",
            Unit::Count,
            "Items dropped, labelled by reason."
        );
    });
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[a-z!][^>]*>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turn feed/page text into plain text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let decoded = html_escape::decode_html_entities(s);

    // 2) Strip HTML tags
    let stripped = RE_TAGS.replace_all(&decoded, " ");

    // 3) Collapse whitespace
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}

/// Remove repeated `(source, link)` pairs within one run; first occurrence wins.
pub fn dedup_items(items: Vec<CollectedItem>) -> (Vec<CollectedItem>, usize) {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(items.len());
    let mut keep = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for it in items {
        if seen.insert((it.source.clone(), it.link.clone())) {
            keep.push(it);
        } else {
            dropped += 1;
        }
    }
    (keep, dropped)
}
