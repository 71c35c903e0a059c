// src/config/mod.rs
//! Service configuration: `[form]` + `[spam]` tables from TOML, env overrides,
//! and SMTP settings from the environment.

pub mod policy;
pub mod smtp;

pub use policy::{SpamPolicy, DEFAULT_SUCCESS_MESSAGE};
pub use smtp::{Encryption, SmtpSettings};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/contact.toml";
pub const DEFAULT_AUDIT_SALT: &str = "contact_form_spam_log";

pub const ENV_CONFIG_PATH: &str = "CONTACT_CONFIG_PATH";
pub const ENV_SPAM_ENABLED: &str = "SPAM_FILTER_ENABLED";
pub const ENV_SPAM_MINIMUM_MATCHES: &str = "SPAM_MINIMUM_MATCHES";
pub const ENV_AUDIT_SALT: &str = "AUDIT_SALT";

fn default_subject_prefix() -> String {
    "New Project Request".to_string()
}
fn default_site_name() -> String {
    "Contact Form".to_string()
}
fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

/// Branding and user-facing text for the form endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_success_message")]
    pub success_message: String,
    /// Optional logo shown at the top of the HTML notification.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            subject_prefix: default_subject_prefix(),
            site_name: default_site_name(),
            success_message: default_success_message(),
            logo_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub spam: SpamPolicy,
}

impl AppConfig {
    /// Load using `CONTACT_CONFIG_PATH` or `config/contact.toml`, then apply env overrides.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            let cfg = Self::load_from(&path)?;
            info!(
                target: "config",
                path = %path.display(),
                high = cfg.spam.high_confidence.len(),
                low = cfg.spam.low_confidence.len(),
                domains = cfg.spam.blocked_email_domains.len(),
                "contact config loaded"
            );
            cfg
        } else {
            warn!(target: "config", path = %path.display(), "config file missing, using defaults");
            Self::default()
        };

        cfg.apply_overrides(|k| std::env::var(k).ok())?;
        if cfg.reply_mismatch() {
            warn!(
                target: "config",
                "spam.rejection_message differs from form.success_message, rejected senders can tell"
            );
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading contact config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing contact config at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s)?;
        Ok(cfg.normalized())
    }

    fn normalized(mut self) -> Self {
        self.spam = self.spam.normalized();
        if self.form.success_message.trim().is_empty() {
            self.form.success_message = default_success_message();
        }
        // A rejection message left at its default follows a custom success message.
        if self.spam.rejection_message == DEFAULT_SUCCESS_MESSAGE {
            self.spam.rejection_message = self.form.success_message.clone();
        }
        self
    }

    /// True when a silent reject would answer with different text than a
    /// delivered submission.
    pub fn reply_mismatch(&self) -> bool {
        self.spam.rejection_message.trim() != self.form.success_message.trim()
    }

    /// `SPAM_FILTER_ENABLED` and `SPAM_MINIMUM_MATCHES` win over the file.
    pub fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get(ENV_SPAM_ENABLED) {
            self.spam.enabled = parse_flag(&raw)
                .ok_or_else(|| anyhow!("{ENV_SPAM_ENABLED} must be a boolean, got `{raw}`"))?;
        }
        if let Some(raw) = get(ENV_SPAM_MINIMUM_MATCHES) {
            let n = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("{ENV_SPAM_MINIMUM_MATCHES} `{raw}`: {e}"))?;
            self.spam.minimum_matches = n.max(1);
        }
        Ok(())
    }
}

/// Salt for pseudonymous submission ids in audit logs.
pub fn audit_salt() -> String {
    std::env::var(ENV_AUDIT_SALT)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIT_SALT.to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
