// src/ingest/sources.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ingest::types::SourceMap;

const DEFAULT_RSS: &[(&str, &str)] = &[
    ("CAPES", "https://www.gov.br/capes/pt-br/assuntos/noticias/rss"),
    (
        "CNPq",
        "https://www.gov.br/cnpq/pt-br/assuntos/noticias/ultimas-noticias/RSS",
    ),
    ("FINEP", "https://www.finep.gov.br/noticias?format=feed&type=rss"),
    (
        "MCTI",
        "https://www.gov.br/mcti/pt-br/acompanhe-o-mcti/noticias/RSS",
    ),
    ("FAPEMA", "https://www.fapema.br/portal/feed/"),
];

const DEFAULT_HTML: &[(&str, &str)] = &[
    (
        "CAPES - Editais",
        "https://www.gov.br/capes/pt-br/assuntos/editais",
    ),
    ("CNPq - Chamadas", "https://www.gov.br/cnpq/pt-br/chamadas"),
    (
        "FINEP - Chamadas",
        "https://www.finep.gov.br/chamadas-publicas",
    ),
    (
        "MCTI - Editais",
        "https://www.gov.br/mcti/pt-br/acompanhe-o-mcti/editais-e-chamadas",
    ),
    ("FAPEMA - Editais", "https://www.fapema.br/portal/editais/"),
];

/// The two source flavours for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub rss: SourceMap,
    pub html: SourceMap,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            rss: default_rss(),
            html: default_html(),
        }
    }
}

pub fn default_rss() -> SourceMap {
    to_map(DEFAULT_RSS)
}

pub fn default_html() -> SourceMap {
    to_map(DEFAULT_HTML)
}

fn to_map(pairs: &[(&str, &str)]) -> SourceMap {
    pairs
        .iter()
        .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    rss_sources: Option<SourceMap>,
    #[serde(default)]
    html_sources: Option<SourceMap>,
}

/// Load RSS/HTML sources, falling back to the built-in lists.
///
/// - `None` or a missing file → defaults.
/// - Unreadable or unparseable file → warning + defaults.
/// - Missing/empty `rss_sources` or `html_sources` → that side's defaults.
pub fn load_sources(path: Option<&Path>) -> Sources {
    let Some(path) = path else {
        return Sources::default();
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no sources override file, using defaults");
        return Sources::default();
    }
    match load_sources_from(path) {
        Ok(sources) => {
            tracing::info!(
                path = %path.display(),
                rss = sources.rss.len(),
                html = sources.html.len(),
                "loaded sources override"
            );
            sources
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{e:#}"),
                "failed to load sources override, using defaults"
            );
            Sources::default()
        }
    }
}

/// Strict variant: any read or parse error is returned.
pub fn load_sources_from(path: &Path) -> Result<Sources> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    parse_sources(&content).with_context(|| format!("parsing sources in {}", path.display()))
}

fn parse_sources(s: &str) -> Result<Sources> {
    // An empty document deserializes to unit; treat it like "no overrides".
    if s.trim().is_empty() {
        return Ok(Sources::default());
    }
    let file: SourcesFile = serde_yaml::from_str(s)?;
    Ok(Sources {
        rss: clean_map(file.rss_sources).unwrap_or_else(default_rss),
        html: clean_map(file.html_sources).unwrap_or_else(default_html),
    })
}

/// Drop blank names/URLs; `None` when nothing usable remains.
fn clean_map(map: Option<SourceMap>) -> Option<SourceMap> {
    let cleaned: SourceMap = map?
        .into_iter()
        .filter_map(|(name, url)| {
            let name = name.trim();
            let url = url.trim();
            (!name.is_empty() && !url.is_empty()).then(|| (name.to_string(), url.to_string()))
        })
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_five_of_each() {
        let s = Sources::default();
        assert_eq!(s.rss.len(), 5);
        assert_eq!(s.html.len(), 5);
        assert!(s.rss.contains_key("CAPES"));
        assert!(s.html.contains_key("FAPEMA - Editais"));
    }

    #[test]
    fn override_replaces_only_given_side() {
        let yaml = r#"
rss_sources:
  FAPESP: "https://fapesp.br/rss"
"#;
        let s = parse_sources(yaml).unwrap();
        assert_eq!(s.rss.len(), 1);
        assert_eq!(s.rss["FAPESP"], "https://fapesp.br/rss");
        assert_eq!(s.html, default_html());
    }

    #[test]
    fn empty_mapping_falls_back() {
        let yaml = "rss_sources: {}\nhtml_sources:\n";
        let s = parse_sources(yaml).unwrap();
        assert_eq!(s, Sources::default());
    }

    #[test]
    fn blank_entries_are_dropped() {
        let yaml = r#"
html_sources:
  " ": "https://x.test"
  "UFMA": "  "
  "FAPEMIG": " https://fapemig.br/editais "
"#;
        let s = parse_sources(yaml).unwrap();
        assert_eq!(s.html.len(), 1);
        assert_eq!(s.html["FAPEMIG"], "https://fapemig.br/editais");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse_sources("rss_sources: [unterminated").is_err());
    }
}
