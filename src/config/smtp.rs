// src/config/smtp.rs
use anyhow::{anyhow, bail, Result};
use std::env;

/// Values shipped in sample configs that must never reach a live transport.
const PLACEHOLDERS: &[&str] = &["your-email@gmail.com", "your-app-password-here"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    /// STARTTLS upgrade, usually port 587.
    StartTls,
    /// Implicit TLS, usually port 465.
    Tls,
}

impl Encryption {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "tls" | "starttls" => Ok(Encryption::StartTls),
            "ssl" | "smtps" => Ok(Encryption::Tls),
            other => bail!("unsupported SMTP_ENCRYPTION: {other}"),
        }
    }
}

/// SMTP credentials and addressing, taken from the environment (never from TOML).
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub recipient_email: String,
    pub recipient_name: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("encryption", &self.encryption)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_email", &self.from_email)
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}

impl SmtpSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            let v = get(key).map(|s| s.trim().to_string()).unwrap_or_default();
            if v.is_empty() || PLACEHOLDERS.contains(&v.as_str()) {
                return Err(anyhow!("Configuration field '{key}' needs to be set"));
            }
            Ok(v)
        };

        let host = required("SMTP_HOST")?;
        let username = required("SMTP_USER")?;
        let password = required("SMTP_PASS")?;
        let from_email = required("MAIL_FROM")?;
        let recipient_email = required("MAIL_TO")?;

        let port = match get("SMTP_PORT") {
            Some(p) if !p.trim().is_empty() => p
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("invalid SMTP_PORT `{p}`: {e}"))?,
            _ => 587,
        };
        let encryption = Encryption::parse(&get("SMTP_ENCRYPTION").unwrap_or_default())?;

        let from_name = get("MAIL_FROM_NAME").unwrap_or_default().trim().to_string();
        let recipient_name = get("MAIL_TO_NAME").unwrap_or_default().trim().to_string();

        Ok(Self {
            host,
            port,
            encryption,
            username,
            password,
            from_email,
            from_name,
            recipient_email,
            recipient_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full() -> HashMap<String, String> {
        vars(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "mailer@example.com"),
            ("SMTP_PASS", "secret"),
            ("MAIL_FROM", "site@example.com"),
            ("MAIL_TO", "inbox@example.com"),
        ])
    }

    #[test]
    fn defaults_port_and_starttls() {
        let m = full();
        let s = SmtpSettings::from_lookup(|k| m.get(k).cloned()).unwrap();
        assert_eq!(s.port, 587);
        assert_eq!(s.encryption, Encryption::StartTls);
        assert!(!format!("{s:?}").contains("secret"));
    }

    #[test]
    fn placeholder_password_rejected() {
        let mut m = full();
        m.insert("SMTP_PASS".into(), "your-app-password-here".into());
        let err = SmtpSettings::from_lookup(|k| m.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("SMTP_PASS"));
    }

    #[test]
    fn ssl_and_custom_port() {
        let mut m = full();
        m.insert("SMTP_PORT".into(), "465".into());
        m.insert("SMTP_ENCRYPTION".into(), "SSL".into());
        let s = SmtpSettings::from_lookup(|k| m.get(k).cloned()).unwrap();
        assert_eq!(s.port, 465);
        assert_eq!(s.encryption, Encryption::Tls);
    }

    #[test]
    fn missing_host_is_an_error() {
        let mut m = full();
        m.remove("SMTP_HOST");
        assert!(SmtpSettings::from_lookup(|k| m.get(k).cloned()).is_err());
    }
}
