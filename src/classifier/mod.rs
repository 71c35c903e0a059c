// src/classifier/mod.rs
//! Submission classifier: a fixed, ordered pipeline of heuristic layers.
//!
//! Order (first rejection wins):
//! 1) bot patterns: HTML, URLs in short fields, Cyrillic name, messaging links
//! 2) sender: blocked domain, blocked local-part prefix
//! 3) gibberish: every meaningful field too short
//! 4) high-confidence keywords (whole word, any hit)
//! 5) low-confidence keywords (substring, count >= threshold)
//!
//! The classifier is pure: no I/O, no clock, no shared state. Logging and the
//! HTTP response belong to `crate::respond`.

pub mod bot;
pub mod content;
pub mod keywords;
pub mod sender;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use self::keywords::KeywordMatcher;
use crate::config::SpamPolicy;
use crate::submission::{FormType, Submission};

/// Why a submission was dropped. Serialized as the audit tag (`BOT-HTML`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectReason {
    #[serde(rename = "BOT-HTML")]
    BotHtml,
    #[serde(rename = "BOT-URL")]
    BotUrl,
    #[serde(rename = "BOT-CYRILLIC")]
    BotCyrillic,
    #[serde(rename = "BOT-MESSAGING")]
    BotMessaging,
    #[serde(rename = "BLOCKED-DOMAIN")]
    BlockedDomain,
    #[serde(rename = "BLOCKED-PREFIX")]
    BlockedPrefix,
    #[serde(rename = "BOT-GIBBERISH")]
    BotGibberish,
    #[serde(rename = "HIGH-KEYWORD")]
    HighKeyword,
    #[serde(rename = "LOW-THRESHOLD")]
    LowThreshold,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::BotHtml => "BOT-HTML",
            RejectReason::BotUrl => "BOT-URL",
            RejectReason::BotCyrillic => "BOT-CYRILLIC",
            RejectReason::BotMessaging => "BOT-MESSAGING",
            RejectReason::BlockedDomain => "BLOCKED-DOMAIN",
            RejectReason::BlockedPrefix => "BLOCKED-PREFIX",
            RejectReason::BotGibberish => "BOT-GIBBERISH",
            RejectReason::HighKeyword => "HIGH-KEYWORD",
            RejectReason::LowThreshold => "LOW-THRESHOLD",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub reason: RejectReason,
    /// Matched pattern, keyword list or domain. For audit logs only.
    pub detail: String,
}

impl Rejection {
    fn new(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// Sub-threshold low-confidence hits: delivered, but worth a human look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftFlag {
    pub matches: Vec<String>,
    pub threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    Accept {
        #[serde(skip_serializing_if = "Option::is_none")]
        flag: Option<SoftFlag>,
    },
    Reject(Rejection),
}

impl Verdict {
    pub fn accept() -> Self {
        Verdict::Accept { flag: None }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Reject(r) => Some(r),
            Verdict::Accept { .. } => None,
        }
    }

    pub fn soft_flag(&self) -> Option<&SoftFlag> {
        match self {
            Verdict::Accept { flag } => flag.as_ref(),
            Verdict::Reject(_) => None,
        }
    }
}

impl From<Rejection> for Verdict {
    fn from(r: Rejection) -> Self {
        Verdict::Reject(r)
    }
}

/// Policy-bound classifier handle shared through the router state. Holds the
/// normalized policy and its keyword patterns, compiled once.
#[derive(Debug, Clone)]
pub struct SubmissionClassifier {
    policy: Arc<SpamPolicy>,
    keywords: Arc<KeywordMatcher>,
}

impl SubmissionClassifier {
    /// Normalizes `policy` and compiles its keyword lists. Fails on a phrase
    /// the regex engine rejects.
    pub fn new(policy: SpamPolicy) -> Result<Self> {
        let policy = policy.normalized();
        let keywords = KeywordMatcher::new(&policy.high_confidence, &policy.low_confidence)
            .context("compiling spam keyword patterns")?;
        Ok(Self {
            policy: Arc::new(policy),
            keywords: Arc::new(keywords),
        })
    }

    pub fn policy(&self) -> &SpamPolicy {
        &self.policy
    }

    pub fn classify(&self, submission: &Submission) -> Verdict {
        run(submission, &self.policy, &self.keywords)
    }
}

type Layer = fn(&Submission, &SpamPolicy) -> Option<Rejection>;

/// One-shot classification against any policy. Compiles the keyword lists on
/// each call; long-lived callers hold a [`SubmissionClassifier`] instead.
pub fn classify(submission: &Submission, policy: &SpamPolicy) -> Verdict {
    if !policy.enabled {
        return Verdict::accept();
    }
    let keywords = KeywordMatcher::lenient(&policy.high_confidence, &policy.low_confidence);
    run(submission, policy, &keywords)
}

/// Disabled policy always accepts; otherwise first rejection wins.
fn run(submission: &Submission, policy: &SpamPolicy, keywords: &KeywordMatcher) -> Verdict {
    if !policy.enabled {
        return Verdict::accept();
    }

    const LAYERS: [Layer; 3] = [bot_patterns, sender_address, gibberish];
    for layer in LAYERS {
        if let Some(rejection) = layer(submission, policy) {
            return rejection.into();
        }
    }

    let content = keyword_content(submission);
    if let Some(rejection) = high_confidence(&content, keywords) {
        return rejection.into();
    }
    low_confidence(&content, keywords, policy.minimum_matches)
}

/// Sanitized `name description logline script_title project_type`, space-joined.
pub fn keyword_content(s: &Submission) -> String {
    [
        &s.name.sanitized,
        &s.description.sanitized,
        &s.logline.sanitized,
        &s.script_title.sanitized,
        &s.project_type.sanitized,
    ]
    .iter()
    .map(|f| f.as_str())
    .collect::<Vec<_>>()
    .join(" ")
}

fn join_fields(fields: &[&str]) -> String {
    fields.join(" ")
}

fn bot_patterns(s: &Submission, p: &SpamPolicy) -> Option<Rejection> {
    if p.block_html_in_fields {
        let raw = join_fields(&[
            s.name.raw.as_str(),
            s.description.raw.as_str(),
            s.logline.raw.as_str(),
            s.script_title.raw.as_str(),
        ]);
        let sanitized = join_fields(&[
            s.name.sanitized.as_str(),
            s.description.sanitized.as_str(),
            s.logline.sanitized.as_str(),
            s.script_title.sanitized.as_str(),
        ]);
        if let Some(hit) = bot::contains_html(&raw).or_else(|| bot::contains_html(&sanitized)) {
            return Some(Rejection::new(RejectReason::BotHtml, hit));
        }
    }

    if p.block_urls_in_fields {
        // Description is left out: clients legitimately paste their own site.
        let short_fields = join_fields(&[
            s.name.raw.as_str(),
            s.logline.raw.as_str(),
            s.script_title.raw.as_str(),
        ]);
        if let Some(hit) = bot::contains_url(&short_fields) {
            return Some(Rejection::new(RejectReason::BotUrl, hit));
        }
    }

    if p.block_cyrillic_name && bot::contains_cyrillic(&s.name.raw) {
        return Some(Rejection::new(
            RejectReason::BotCyrillic,
            "Cyrillic characters in name",
        ));
    }

    if p.block_messaging_links {
        let every_field = join_fields(&[
            s.name.raw.as_str(),
            s.project_type.raw.as_str(),
            s.description.raw.as_str(),
            s.script_type.raw.as_str(),
            s.script_title.raw.as_str(),
            s.logline.raw.as_str(),
        ]);
        if let Some(host) = bot::messaging_link(&every_field) {
            return Some(Rejection::new(
                RejectReason::BotMessaging,
                format!("{host} link"),
            ));
        }
    }

    None
}

fn sender_address(s: &Submission, p: &SpamPolicy) -> Option<Rejection> {
    let email = &s.email.sanitized;
    if let Some(domain) = sender::is_blocked_domain(email, &p.blocked_email_domains) {
        return Some(Rejection::new(RejectReason::BlockedDomain, domain));
    }
    if let Some(prefix) = sender::blocked_prefix(email, &p.blocked_email_prefixes) {
        return Some(Rejection::new(RejectReason::BlockedPrefix, prefix));
    }
    None
}

fn gibberish(s: &Submission, p: &SpamPolicy) -> Option<Rejection> {
    let min = p.min_meaningful_field_length;
    match s.form_type {
        FormType::Writer => content::is_gibberish(
            &[s.script_title.sanitized.as_str(), s.logline.sanitized.as_str()],
            min,
        )
        .then(|| {
            Rejection::new(
                RejectReason::BotGibberish,
                "All text fields below minimum length",
            )
        }),
        FormType::Client => content::is_gibberish(&[s.description.sanitized.as_str()], min)
            .then(|| {
                Rejection::new(
                    RejectReason::BotGibberish,
                    "Description below minimum length",
                )
            }),
    }
}

fn high_confidence(content: &str, keywords: &KeywordMatcher) -> Option<Rejection> {
    let hits = keywords.high_confidence(content);
    if hits.is_empty() {
        return None;
    }
    Some(Rejection::new(RejectReason::HighKeyword, hits.join(", ")))
}

fn low_confidence(content: &str, keywords: &KeywordMatcher, minimum_matches: usize) -> Verdict {
    let hits = keywords.low_confidence(content);
    let threshold = minimum_matches.max(1);

    if hits.is_empty() {
        return Verdict::accept();
    }
    if hits.len() >= threshold {
        return Rejection::new(
            RejectReason::LowThreshold,
            format!("{}/{} matches: {}", hits.len(), threshold, hits.join(", ")),
        )
        .into();
    }

    Verdict::Accept {
        flag: Some(SoftFlag {
            matches: hits.into_iter().map(str::to_string).collect(),
            threshold,
        }),
    }
}
