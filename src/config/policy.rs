// src/config/policy.rs
use serde::{Deserialize, Serialize};

pub const DEFAULT_MINIMUM_MATCHES: usize = 2;
pub const DEFAULT_MIN_FIELD_LENGTH: usize = 10;
pub const DEFAULT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! We will get back to you soon.";

fn default_true() -> bool {
    true
}
fn default_minimum_matches() -> usize {
    DEFAULT_MINIMUM_MATCHES
}
fn default_min_field_length() -> usize {
    DEFAULT_MIN_FIELD_LENGTH
}
fn default_rejection_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

/// Spam screening policy, read from the `[spam]` table.
///
/// Load through [`SpamPolicy::normalized`] (done by `AppConfig`) so keyword and
/// domain lists are trimmed, de-duplicated and lower-cased where matching needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamPolicy {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whole-word phrases; one hit rejects.
    #[serde(default)]
    pub high_confidence: Vec<String>,
    /// Substring phrases; rejects once `minimum_matches` distinct ones hit.
    #[serde(default)]
    pub low_confidence: Vec<String>,
    #[serde(default = "default_minimum_matches")]
    pub minimum_matches: usize,
    #[serde(default)]
    pub blocked_email_domains: Vec<String>,
    #[serde(default)]
    pub blocked_email_prefixes: Vec<String>,
    #[serde(default = "default_true")]
    pub block_html_in_fields: bool,
    #[serde(default = "default_true")]
    pub block_urls_in_fields: bool,
    #[serde(default = "default_true")]
    pub block_cyrillic_name: bool,
    /// `t.me/` and `wa.me/` links anywhere, description included.
    #[serde(default)]
    pub block_messaging_links: bool,
    #[serde(default = "default_min_field_length")]
    pub min_meaningful_field_length: usize,
    /// Message sent back on a silent reject. Keep it identical to the success text.
    #[serde(default = "default_rejection_message")]
    pub rejection_message: String,
}

impl Default for SpamPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            high_confidence: Vec::new(),
            low_confidence: Vec::new(),
            minimum_matches: DEFAULT_MINIMUM_MATCHES,
            blocked_email_domains: Vec::new(),
            blocked_email_prefixes: Vec::new(),
            block_html_in_fields: true,
            block_urls_in_fields: true,
            block_cyrillic_name: true,
            block_messaging_links: false,
            min_meaningful_field_length: DEFAULT_MIN_FIELD_LENGTH,
            rejection_message: default_rejection_message(),
        }
    }
}

impl SpamPolicy {
    /// A policy that lets everything through.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// One-time cleanup applied at load so the classifier never re-checks.
    pub fn normalized(mut self) -> Self {
        self.high_confidence = dedup_phrases(self.high_confidence);
        self.low_confidence = dedup_phrases(self.low_confidence);
        self.blocked_email_domains = lower_list(self.blocked_email_domains);
        self.blocked_email_prefixes = lower_list(self.blocked_email_prefixes);
        if self.minimum_matches == 0 {
            self.minimum_matches = 1;
        }
        if self.rejection_message.trim().is_empty() {
            self.rejection_message = default_rejection_message();
        }
        self
    }
}

/// Trim, drop empties, de-duplicate case-insensitively. First spelling wins.
fn dedup_phrases(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if t.is_empty() {
            continue;
        }
        if seen.insert(t.to_lowercase()) {
            out.push(t.to_string());
        }
    }
    out
}

fn lower_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let p: SpamPolicy = toml::from_str("").unwrap();
        assert_eq!(p, SpamPolicy::default());
        assert!(p.enabled);
        assert!(!p.block_messaging_links);
        assert_eq!(p.minimum_matches, 2);
        assert_eq!(p.min_meaningful_field_length, 10);
    }

    #[test]
    fn normalization_cleans_lists() {
        let p = SpamPolicy {
            high_confidence: vec![" SEO services ".into(), "seo services".into(), "".into()],
            blocked_email_domains: vec!["Mailinator.COM".into(), "mailinator.com".into(), " ".into()],
            blocked_email_prefixes: vec!["NoReply".into()],
            minimum_matches: 0,
            rejection_message: "   ".into(),
            ..SpamPolicy::default()
        }
        .normalized();

        assert_eq!(p.high_confidence, vec!["SEO services".to_string()]);
        assert_eq!(p.blocked_email_domains, vec!["mailinator.com".to_string()]);
        assert_eq!(p.blocked_email_prefixes, vec!["noreply".to_string()]);
        assert_eq!(p.minimum_matches, 1);
        assert_eq!(p.rejection_message, DEFAULT_SUCCESS_MESSAGE);
    }
}
