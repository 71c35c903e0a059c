// src/classifier/keywords.rs
//! Layers 4 and 5: keyword matching over the lower-cased sanitized content.
//!
//! High-confidence phrases must stand as whole words ("seo services" hits
//! "need seo services?" but not "video services"). Low-confidence phrases are
//! plain substrings, so "website redesign" also hits "mywebsite redesign".
//!
//! Patterns are compiled once into a [`KeywordMatcher`]. Phrases are trimmed
//! and de-duplicated case-insensitively there, so a hit list never names the
//! same phrase twice whatever the policy looks like.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone)]
struct CompiledPhrase {
    keyword: String,
    re: Regex,
}

#[derive(Debug, Clone)]
struct Needle {
    keyword: String,
    lower: String,
}

/// Compiled high- and low-confidence lists.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatcher {
    high: Vec<CompiledPhrase>,
    low: Vec<Needle>,
}

impl KeywordMatcher {
    /// Compile both lists. A phrase that fails to compile is an error.
    pub fn new(high: &[String], low: &[String]) -> Result<Self> {
        let high = distinct(high)
            .into_iter()
            .map(|kw| {
                let re = word_pattern(kw)
                    .map_err(|e| anyhow!("high-confidence keyword `{kw}` regex error: {e}"))?;
                Ok(CompiledPhrase {
                    keyword: kw.to_string(),
                    re,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            high,
            low: needles(low),
        })
    }

    /// Like [`KeywordMatcher::new`] but drops phrases that fail to compile.
    pub fn lenient(high: &[String], low: &[String]) -> Self {
        let high = distinct(high)
            .into_iter()
            .filter_map(|kw| match word_pattern(kw) {
                Ok(re) => Some(CompiledPhrase {
                    keyword: kw.to_string(),
                    re,
                }),
                Err(e) => {
                    warn!(target: "spam", keyword = %kw, error = %e, "keyword pattern rejected");
                    None
                }
            })
            .collect();
        Self {
            high,
            low: needles(low),
        }
    }

    /// Whole-word, case-insensitive. Matched keywords in configured order and spelling.
    pub fn high_confidence(&self, content: &str) -> Vec<&str> {
        let content = content.to_lowercase();
        self.high
            .iter()
            .filter(|p| p.re.is_match(&content))
            .map(|p| p.keyword.as_str())
            .collect()
    }

    /// Substring, case-insensitive. Each distinct phrase counts once.
    pub fn low_confidence(&self, content: &str) -> Vec<&str> {
        let content = content.to_lowercase();
        self.low
            .iter()
            .filter(|n| content.contains(n.lower.as_str()))
            .map(|n| n.keyword.as_str())
            .collect()
    }
}

/// Trimmed, non-empty, first spelling of each case-insensitive duplicate.
fn distinct(items: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

fn needles(items: &[String]) -> Vec<Needle> {
    distinct(items)
        .into_iter()
        .map(|kw| Needle {
            keyword: kw.to_string(),
            lower: kw.to_lowercase(),
        })
        .collect()
}

fn word_pattern(keyword: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&keyword.to_lowercase())))
}
