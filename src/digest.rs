// src/digest.rs
//! Plain-text digest rendered for the email body and the stdout preview.

use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::ingest::types::CollectedItem;

/// Newest first by `(published_at, source, title)`; undated items go last.
pub fn sort_items(items: &mut [CollectedItem]) {
    items.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y
            .cmp(&x)
            .then_with(|| b.source.cmp(&a.source))
            .then_with(|| b.title.cmp(&a.title)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .source
            .cmp(&a.source)
            .then_with(|| b.title.cmp(&a.title)),
    });
}

pub fn format_digest(items: &[CollectedItem], recency_days: u32) -> String {
    if items.is_empty() {
        return format!("Nenhum edital encontrado nos últimos {recency_days} dias.");
    }

    let mut out = format!(
        "📢 Editais e Chamadas Públicas - últimos {recency_days} dias ({} itens)\n",
        items.len()
    );
    for (i, it) in items.iter().enumerate() {
        let _ = write!(out, "\n{}. [{}] {}\n", i + 1, it.source, it.title);
        if let Some(dt) = it.published_at {
            let _ = writeln!(out, "   Data: {}", dt.format("%Y-%m-%d %H:%M UTC"));
        }
        let _ = writeln!(out, "   Link: {}", it.link);
    }
    out
}

pub fn default_subject(recency_days: u32) -> String {
    format!("📢 Monitor Editais Brasil - últimos {recency_days} dias")
}
