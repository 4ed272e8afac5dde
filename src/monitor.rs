// src/monitor.rs
//! One monitoring run: collect, filter, render, notify, log.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::{load_email_config, AppConfig};
use crate::digest::{default_subject, format_digest, sort_items};
use crate::history::append_csv;
use crate::ingest::dedup_items;
use crate::ingest::fetch::Fetcher;
use crate::ingest::providers::{collect_html, collect_rss};
use crate::ingest::sources::{load_sources, Sources};
use crate::ingest::types::CollectedItem;
use crate::notify::{EmailNotifier, Notifier};
use crate::relevance::KeywordFilter;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: AppConfig,
    /// Preview only: no notification and no CSV append.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub executed_at: DateTime<Utc>,
    pub items: Vec<CollectedItem>,
    pub subject: String,
    pub digest: String,
    pub notified: bool,
    pub csv_written: bool,
}

/// RSS sources first, then HTML; merged, deduplicated by `(source, link)`, sorted.
pub async fn collect_all(
    fetcher: &Fetcher,
    sources: &Sources,
    filter: &KeywordFilter,
    recency_days: u32,
    now: DateTime<Utc>,
) -> Vec<CollectedItem> {
    let mut items = collect_rss(fetcher, &sources.rss, filter, recency_days, now).await;
    let rss_count = items.len();
    items.extend(collect_html(fetcher, &sources.html, filter).await);

    let (mut items, dropped) = dedup_items(items);
    sort_items(&mut items);
    tracing::info!(
        rss = rss_count,
        total = items.len(),
        duplicates = dropped,
        "collection finished"
    );
    items
}

/// Build the email notifier from `EMAIL_USER` / `EMAIL_PASS` / `EMAIL_TO`.
/// A dry run needs no credentials and gets `None`.
pub fn prepare_notifier(cfg: &AppConfig, dry_run: bool) -> Result<Option<EmailNotifier>> {
    if dry_run {
        return Ok(None);
    }
    let email = load_email_config().context("reading email configuration")?;
    let notifier = EmailNotifier::new(&email, &cfg.smtp_host, cfg.smtp_port)?;
    Ok(Some(notifier))
}

/// Credentials first, then the run. Missing credentials fail before any
/// source is fetched.
pub async fn execute(opts: &RunOptions) -> Result<RunReport> {
    let notifier = prepare_notifier(&opts.config, opts.dry_run)?;
    run(opts, notifier.as_ref().map(|n| n as &dyn Notifier)).await
}

/// Execute one run. A notifier error aborts the run before the CSV log is
/// touched; a CSV error is only logged.
pub async fn run(opts: &RunOptions, notifier: Option<&dyn Notifier>) -> Result<RunReport> {
    let cfg = &opts.config;
    let executed_at = Utc::now();

    let sources = load_sources(Some(&cfg.sources_path));
    let filter = KeywordFilter::load(cfg.keywords_path.as_deref())
        .context("loading keyword patterns")?;
    let fetcher = Fetcher::new(cfg)?;

    tracing::info!(
        rss_sources = sources.rss.len(),
        html_sources = sources.html.len(),
        recency_days = cfg.recency_days,
        dry_run = opts.dry_run,
        "run started"
    );

    let items = collect_all(&fetcher, &sources, &filter, cfg.recency_days, executed_at).await;
    let digest = format_digest(&items, cfg.recency_days);
    let subject = default_subject(cfg.recency_days);

    println!("{digest}");

    let mut notified = false;
    match notifier {
        Some(n) if !opts.dry_run => {
            n.send(&subject, &digest)
                .await
                .context("sending digest notification")?;
            notified = true;
        }
        Some(_) => tracing::info!("dry run: notification skipped"),
        None => tracing::debug!("no notifier configured"),
    }

    let mut csv_written = false;
    if opts.dry_run {
        tracing::info!("dry run: CSV log skipped");
    } else {
        match append_csv(&items, &cfg.csv_path, executed_at) {
            Ok(()) => csv_written = true,
            Err(e) => tracing::warn!(
                path = %cfg.csv_path.display(),
                error = %format!("{e:#}"),
                "CSV log write failed"
            ),
        }
    }

    Ok(RunReport {
        executed_at,
        items,
        subject,
        digest,
        notified,
        csv_written,
    })
}
