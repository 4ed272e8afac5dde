// src/relevance.rs
//! Relevance gate shared by both collectors: recency window plus
//! negative/positive keyword pattern sets.

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Funding-call vocabulary. Any one match is enough.
pub const DEFAULT_POSITIVE_TERMS: &[&str] = &[
    r"\bedita(l|is|les)\b",
    r"\bchamadas?\s+p(ú|u)blicas?\b",
    r"\bsele(ç|c)(ã|a)o\s+p(ú|u)blica\b",
    r"\bconvocat(ó|o)rias?\b",
    r"\bbolsas?\b",
    r"\bfomento\b",
    r"\bpesquisas?\b",
    r"\binova(ç|c)(ã|a)o\b",
    r"\bportarias?\b",
    r"\bconcursos?\b",
    r"\bsubmiss(ã|a)o\b",
    r"\bprorroga(ç|c)(ã|a)o\b",
    r"\bretifica(ç|c)(ã|a)o\s+d[eo]\s+edital\b",
    r"\bci(ê|e)ncia\b",
];

/// Procurement/bidding notices. Any one match rejects the item.
pub const DEFAULT_NEGATIVE_TERMS: &[&str] = &[
    r"\bedital\s+de\s+licita(ç|c)(ã|a)o\b",
    r"\blicita(ç|c)(ã|a)o\b",
    r"\bpreg(ã|a)o\s+eletr(ô|o)nico\b",
];

#[derive(Debug, Error)]
pub enum RelevanceError {
    #[error("invalid {kind} pattern `{pattern}`: {source}")]
    Pattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("keyword config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("reading keyword config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

/// `positive = [...]` / `negative = [...]`; an absent or empty list keeps the
/// built-in list for that side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// Outcome of the keyword gate for one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    /// Rejected by the negative pattern shown.
    Negative(String),
    NoPositive,
}

impl Verdict {
    pub fn is_keep(&self) -> bool {
        matches!(self, Verdict::Keep)
    }

    /// Short label used for counters and debug logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Verdict::Keep => "keep",
            Verdict::Negative(_) => "negative",
            Verdict::NoPositive => "no_positive",
        }
    }
}

/// Compiled positive/negative pattern sets.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl Default for KeywordFilter {
    fn default() -> Self {
        // The built-in lists are constants covered by tests.
        Self::from_patterns(DEFAULT_POSITIVE_TERMS, DEFAULT_NEGATIVE_TERMS)
            .expect("built-in keyword patterns compile")
    }
}

impl KeywordFilter {
    /// Compile the given pattern lists (case-insensitive, Unicode word boundaries).
    pub fn from_patterns<P, N>(positive: &[P], negative: &[N]) -> Result<Self, RelevanceError>
    where
        P: AsRef<str>,
        N: AsRef<str>,
    {
        Ok(Self {
            positive: compile_all("positive", positive)?,
            negative: compile_all("negative", negative)?,
        })
    }

    pub fn from_config(cfg: &KeywordConfig) -> Result<Self, RelevanceError> {
        let positive = if cfg.positive.is_empty() {
            compile_all("positive", DEFAULT_POSITIVE_TERMS)?
        } else {
            compile_all("positive", &cfg.positive)?
        };
        let negative = if cfg.negative.is_empty() {
            compile_all("negative", DEFAULT_NEGATIVE_TERMS)?
        } else {
            compile_all("negative", &cfg.negative)?
        };
        Ok(Self { positive, negative })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RelevanceError> {
        let cfg: KeywordConfig = toml::from_str(toml_str)?;
        Self::from_config(&cfg)
    }

    /// Load an override file; `None` means the built-in lists.
    pub fn load(path: Option<&Path>) -> Result<Self, RelevanceError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| RelevanceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filter = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            positive = filter.positive.len(),
            negative = filter.negative.len(),
            "loaded keyword override"
        );
        Ok(filter)
    }

    /// Negatives first, then at least one positive.
    pub fn evaluate(&self, text: &str) -> Verdict {
        if let Some(re) = self.negative.iter().find(|re| re.is_match(text)) {
            return Verdict::Negative(re.as_str().to_string());
        }
        if self.positive.iter().any(|re| re.is_match(text)) {
            Verdict::Keep
        } else {
            Verdict::NoPositive
        }
    }

    pub fn is_relevant(&self, text: &str) -> bool {
        self.evaluate(text).is_keep()
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

fn compile_all<S: AsRef<str>>(
    kind: &'static str,
    patterns: &[S],
) -> Result<Vec<Regex>, RelevanceError> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|source| RelevanceError::Pattern {
                    kind,
                    pattern: p.as_ref().to_string(),
                    source,
                })
        })
        .collect()
}

/// True when `published` lies within the trailing `days` window ending at `now`.
/// Missing dates fail closed. A window reaching past the representable date
/// range has no lower bound.
pub fn within_recency(published: Option<DateTime<Utc>>, now: DateTime<Utc>, days: u32) -> bool {
    let Some(dt) = published else {
        return false;
    };
    match Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d)) {
        Some(limit) => dt >= limit,
        None => true,
    }
}

/* ----------------------------
Tests
---------------------------- */
