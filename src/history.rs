//! history.rs: append-only CSV log of every item reported by a run.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::ingest::types::CollectedItem;

pub const CSV_HEADER: [&str; 6] = [
    "timestamp_execucao_utc",
    "fonte",
    "titulo",
    "link",
    "publicado_em",
    "metodo",
];

/// Append one row per item. The header is written only when the file did not
/// exist before this call, zero items included.
pub fn append_csv(items: &[CollectedItem], path: &Path, executed_at: DateTime<Utc>) -> Result<()> {
    let existed = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening CSV log {}", path.display()))?;

    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !existed {
        w.write_record(CSV_HEADER).context("writing CSV header")?;
    }

    let ts = executed_at.to_rfc3339_opts(SecondsFormat::Secs, false);
    for it in items {
        let published = it.published_at_str();
        w.write_record([
            ts.as_str(),
            it.source.as_str(),
            it.title.as_str(),
            it.link.as_str(),
            published.as_str(),
            it.method.as_str(),
        ])
        .with_context(|| format!("writing CSV row for {}", it.link))?;
    }

    w.flush().context("flushing CSV log")?;
    tracing::info!(path = %path.display(), rows = items.len(), "csv log appended");
    Ok(())
}
