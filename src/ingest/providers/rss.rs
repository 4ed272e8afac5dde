// src/ingest/providers/rss.rs
//! Feed collector: RSS 2.0, RSS 1.0 (RDF) and Atom documents.

use chrono::{DateTime, Utc};
use metrics::counter;
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;

use crate::ingest::dates::parse_lenient_datetime;
use crate::ingest::fetch::Fetcher;
use crate::ingest::normalize_text;
use crate::ingest::types::{CollectedItem, Method, SourceMap};
use crate::relevance::{within_recency, KeywordFilter, Verdict};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed XML: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/* ----------------------------
Wire structs (element local names)
---------------------------- */

// `rss > channel > item`, `rdf:RDF > item`, `feed > entry`; the root name is not checked.
#[derive(Debug, Default, Deserialize)]
struct FeedDoc {
    #[serde(default)]
    channel: Option<Channel>,
    #[serde(default)]
    item: Vec<RawEntry>,
    #[serde(default)]
    entry: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct Channel {
    #[serde(default)]
    item: Vec<RawEntry>,
}

/// RSS items and Atom entries share one shape; absent elements stay empty.
/// Every field is a list because feeds repeat elements under different
/// prefixes (`title` / `dc:title`, `link` / `atom:link`).
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(default)]
    title: Vec<TextElem>,
    #[serde(default)]
    link: Vec<LinkElem>,
    #[serde(default)]
    description: Vec<TextElem>,
    #[serde(default)]
    summary: Vec<TextElem>,
    #[serde(default)]
    content: Vec<TextElem>,
    #[serde(default, rename = "pubDate")]
    pub_date: Vec<TextElem>,
    #[serde(default)]
    published: Vec<TextElem>,
    #[serde(default)]
    issued: Vec<TextElem>,
    #[serde(default)]
    date: Vec<TextElem>,
    #[serde(default)]
    updated: Vec<TextElem>,
    #[serde(default)]
    modified: Vec<TextElem>,
}

#[derive(Debug, Default, Deserialize)]
struct TextElem {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct LinkElem {
    #[serde(rename = "@href", default)]
    href: Option<String>,
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

/* ----------------------------
Typed view
---------------------------- */

/// One feed entry with plain-text fields and its raw date candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub summary: String,
    pub link: String,
    /// `pubDate` / `published` / `issued`.
    pub published: Option<String>,
    /// `dc:date` / `updated` / `modified`.
    pub updated: Option<String>,
}

fn first_text(elems: &[TextElem]) -> Option<&str> {
    elems
        .iter()
        .map(|e| e.text.trim())
        .find(|t| !t.is_empty())
}

fn first_of<'a>(groups: &[&'a [TextElem]]) -> Option<&'a str> {
    groups.iter().copied().find_map(first_text)
}

/// RSS: the element text. Atom: the alternate (or rel-less) href, else any href.
fn pick_link(links: &[LinkElem]) -> Option<&str> {
    let text = links
        .iter()
        .map(|l| l.text.trim())
        .find(|t| !t.is_empty());
    if text.is_some() {
        return text;
    }
    links
        .iter()
        .filter(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .find_map(href_of)
        .or_else(|| links.iter().find_map(href_of))
}

fn href_of(l: &LinkElem) -> Option<&str> {
    l.href.as_deref().map(str::trim).filter(|h| !h.is_empty())
}

impl From<RawEntry> for FeedEntry {
    fn from(raw: RawEntry) -> Self {
        Self {
            title: first_text(&raw.title).map(normalize_text).unwrap_or_default(),
            summary: first_of(&[
                raw.description.as_slice(),
                raw.summary.as_slice(),
                raw.content.as_slice(),
            ])
            .map(normalize_text)
            .unwrap_or_default(),
            link: pick_link(&raw.link).map(normalize_text).unwrap_or_default(),
            published: first_of(&[
                raw.pub_date.as_slice(),
                raw.published.as_slice(),
                raw.issued.as_slice(),
            ])
            .map(str::to_string),
            updated: first_of(&[
                raw.date.as_slice(),
                raw.updated.as_slice(),
                raw.modified.as_slice(),
            ])
            .map(str::to_string),
        }
    }
}

static RE_NAMED_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]{1,31});").unwrap());

/// XML only predefines five named entities; feeds that embed HTML ones
/// (`&nbsp;`, `&aacute;`) would otherwise fail to parse.
pub fn scrub_html_entities_for_xml(s: &str) -> String {
    RE_NAMED_ENTITY
        .replace_all(s, |caps: &Captures| {
            let whole = &caps[0];
            match &caps[1] {
                "lt" | "gt" | "amp" | "quot" | "apos" => whole.to_string(),
                _ => {
                    let decoded = html_escape::decode_html_entities(whole);
                    if decoded == whole {
                        // Unknown to HTML too; keep it visible as text.
                        format!("&amp;{}", &whole[1..])
                    } else {
                        html_escape::encode_text(&decoded).into_owned()
                    }
                }
            }
        })
        .into_owned()
}

/// Parse a feed body into entries. Documents without items yield an empty list.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let cleaned = scrub_html_entities_for_xml(xml);
    let doc: FeedDoc = from_str(&cleaned)?;

    let mut raw = Vec::new();
    if let Some(ch) = doc.channel {
        raw.extend(ch.item);
    }
    raw.extend(doc.item);
    raw.extend(doc.entry);
    Ok(raw.into_iter().map(FeedEntry::from).collect())
}

/// First date candidate that parses, in order: published, then updated.
pub fn resolve_published(entry: &FeedEntry) -> Option<DateTime<Utc>> {
    [entry.published.as_deref(), entry.updated.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_lenient_datetime)
}

/// Apply the entry gates (title/link present, recency, keywords) for one source.
pub fn items_from_entries(
    source: &str,
    entries: Vec<FeedEntry>,
    filter: &KeywordFilter,
    recency_days: u32,
    now: DateTime<Utc>,
) -> Vec<CollectedItem> {
    let mut out = Vec::new();
    for entry in entries {
        counter!("editais_entries_total", "method" => "rss").increment(1);

        if entry.title.is_empty() || entry.link.is_empty() {
            counter!("editais_filtered_total", "method" => "rss", "reason" => "incomplete")
                .increment(1);
            continue;
        }

        let published = resolve_published(&entry);
        if !within_recency(published, now, recency_days) {
            let reason = if published.is_none() { "no_date" } else { "stale" };
            tracing::debug!(source, title = %entry.title, reason, "entry outside recency window");
            counter!("editais_filtered_total", "method" => "rss", "reason" => reason).increment(1);
            continue;
        }

        let text = format!("{} {}", entry.title, entry.summary).to_lowercase();
        let verdict = filter.evaluate(&text);
        if let Verdict::Negative(pattern) = &verdict {
            tracing::debug!(
                source,
                title = %entry.title,
                pattern = %pattern,
                "rejected by negative term"
            );
        }
        if !verdict.is_keep() {
            counter!("editais_filtered_total", "method" => "rss", "reason" => verdict.reason())
                .increment(1);
            continue;
        }

        counter!("editais_kept_total", "method" => "rss").increment(1);
        out.push(CollectedItem {
            source: source.to_string(),
            title: entry.title,
            summary: entry.summary,
            link: entry.link,
            published_at: published,
            method: Method::Rss,
        });
    }
    out
}

/// Fetch and filter every feed in `rss_map`, one after the other.
/// A failing source is logged and contributes nothing.
pub async fn collect_rss(
    fetcher: &Fetcher,
    rss_map: &SourceMap,
    filter: &KeywordFilter,
    recency_days: u32,
    now: DateTime<Utc>,
) -> Vec<CollectedItem> {
    crate::ingest::ensure_metrics_described();

    let mut items = Vec::new();
    for (source, url) in rss_map {
        let Some(body) = fetcher.get(url).await else {
            counter!("editais_source_errors_total", "method" => "rss").increment(1);
            continue;
        };
        let entries = match parse_feed(&body) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(source = %source, url = %url, error = %e, "feed parse failed");
                counter!("editais_source_errors_total", "method" => "rss").increment(1);
                continue;
            }
        };
        let seen = entries.len();
        let kept = items_from_entries(source, entries, filter, recency_days, now);
        tracing::info!(source = %source, entries = seen, kept = kept.len(), "rss source done");
        items.extend(kept);
    }
    items
}
