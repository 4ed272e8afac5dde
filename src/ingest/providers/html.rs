// src/ingest/providers/html.rs
//! Listing-page collector: every `<a href>` on the page is a candidate.

use metrics::counter;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::ingest::fetch::Fetcher;
use crate::ingest::types::{CollectedItem, Method, SourceMap};
use crate::relevance::{KeywordFilter, Verdict};

pub const MAX_TITLE_CHARS: usize = 200;
pub const UNTITLED: &str = "(sem título)";

static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Link text (whitespace-collapsed) and absolute target of one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

fn is_skipped_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
}

/// All usable anchors in document order. Hrefs are resolved against `page_url`.
pub fn extract_anchors(html: &str, page_url: &Url) -> Vec<Anchor> {
    let doc = Html::parse_document(html);
    let mut out = Vec::new();

    for el in doc.select(&ANCHOR_SEL) {
        let text = el
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        let href = el.value().attr("href").unwrap_or_default().trim();
        if text.is_empty() || is_skipped_href(href) {
            continue;
        }

        match page_url.join(href) {
            Ok(abs) => out.push(Anchor {
                text,
                href: abs.to_string(),
            }),
            Err(e) => tracing::debug!(href, error = %e, "unresolvable href"),
        }
    }
    out
}

fn truncate_title(text: &str) -> String {
    let t: String = text.chars().take(MAX_TITLE_CHARS).collect();
    let t = t.trim();
    if t.is_empty() {
        UNTITLED.to_string()
    } else {
        t.to_string()
    }
}

/// Keyword-gate the anchors of one page. HTML items carry no date and skip
/// the recency window.
pub fn items_from_page(
    source: &str,
    html: &str,
    page_url: &str,
    filter: &KeywordFilter,
) -> Result<Vec<CollectedItem>, url::ParseError> {
    let base = Url::parse(page_url)?;
    let mut out = Vec::new();

    for anchor in extract_anchors(html, &base) {
        counter!("editais_entries_total", "method" => "html").increment(1);

        let text = format!("{} {}", anchor.text, anchor.href).to_lowercase();
        let verdict = filter.evaluate(&text);
        if let Verdict::Negative(pattern) = &verdict {
            tracing::debug!(
                source,
                text = %anchor.text,
                pattern = %pattern,
                "rejected by negative term"
            );
        }
        if !verdict.is_keep() {
            counter!("editais_filtered_total", "method" => "html", "reason" => verdict.reason())
                .increment(1);
            continue;
        }

        counter!("editais_kept_total", "method" => "html").increment(1);
        out.push(CollectedItem {
            source: source.to_string(),
            title: truncate_title(&anchor.text),
            summary: String::new(),
            link: anchor.href,
            published_at: None,
            method: Method::Html,
        });
    }
    Ok(out)
}

/// Fetch and scan every page in `html_map`, one after the other.
pub async fn collect_html(
    fetcher: &Fetcher,
    html_map: &SourceMap,
    filter: &KeywordFilter,
) -> Vec<CollectedItem> {
    crate::ingest::ensure_metrics_described();

    let mut items = Vec::new();
    for (source, url) in html_map {
        let Some(body) = fetcher.get(url).await else {
            counter!("editais_source_errors_total", "method" => "html").increment(1);
            continue;
        };
        match items_from_page(source, &body, url, filter) {
            Ok(kept) => {
                tracing::info!(source = %source, kept = kept.len(), "html source done");
                items.extend(kept);
            }
            Err(e) => {
                tracing::warn!(source = %source, url = %url, error = %e, "bad page URL");
                counter!("editais_source_errors_total", "method" => "html").increment(1);
            }
        }
    }
    items
}
