// src/submission.rs
//! Parsed contact-form submissions.
//!
//! Every field is kept in two shapes:
//! - `raw`: trimmed but otherwise untouched, for markup/URL/script detection
//!   (sanitising would turn `<a>` into `&lt;a&gt;` and hide it)
//! - `sanitized`: trimmed, backslash-unescaped, HTML-entity-encoded, for
//!   keyword matching and for anything that ends up in an email body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder option the client form's `<select>` submits when untouched.
pub const PROJECT_TYPE_PLACEHOLDER: &str = "Select project type";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Pragmatic address shape: local@label(.label)+ with a 2+ letter TLD.
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email regex")
});

/// Which of the two site forms produced the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    /// "Start a project" form: project type + description.
    #[default]
    Client,
    /// "Sell your script" form: script type, title and logline.
    Writer,
}

impl FormType {
    /// Anything other than `writer` is a client submission.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("writer") {
            FormType::Writer
        } else {
            FormType::Client
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Client => "client",
            FormType::Writer => "writer",
        }
    }
}

/// One form value in both representations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub raw: String,
    pub sanitized: String,
}

impl Field {
    pub fn new(input: &str) -> Self {
        Self {
            raw: input.trim().to_string(),
            sanitized: sanitize_input(input),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sanitized.is_empty()
    }
}

/// Wire shape of the POST body. Missing keys deserialize as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub form_type: String,
    pub name: String,
    pub email: String,
    pub project_type: String,
    pub description: String,
    pub script_type: String,
    pub script_title: String,
    pub logline: String,
}

/// A single, immutable form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub form_type: FormType,
    pub name: Field,
    pub email: Field,
    pub project_type: Field,
    pub description: Field,
    pub script_type: Field,
    pub script_title: Field,
    pub logline: Field,
}

impl From<&ContactForm> for Submission {
    fn from(f: &ContactForm) -> Self {
        Self {
            form_type: FormType::parse(&sanitize_input(&f.form_type)),
            name: Field::new(&f.name),
            email: Field::new(&f.email),
            project_type: Field::new(&f.project_type),
            description: Field::new(&f.description),
            script_type: Field::new(&f.script_type),
            script_title: Field::new(&f.script_title),
            logline: Field::new(&f.logline),
        }
    }
}

impl From<ContactForm> for Submission {
    fn from(f: ContactForm) -> Self {
        Submission::from(&f)
    }
}

impl Submission {
    /// Required-field and email-format checks. Returns every problem at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Name is required".to_string());
        }

        if self.email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(&self.email.raw) {
            errors.push("Invalid email format".to_string());
        }

        match self.form_type {
            FormType::Writer => {
                if self.script_type.is_empty() {
                    errors.push("Script type is required".to_string());
                }
                if self.script_title.is_empty() {
                    errors.push("Script title is required".to_string());
                }
                if self.logline.is_empty() {
                    errors.push("Logline/synopsis is required".to_string());
                }
            }
            FormType::Client => {
                if self.project_type.is_empty()
                    || self.project_type.sanitized == PROJECT_TYPE_PLACEHOLDER
                {
                    errors.push("Project type is required".to_string());
                }
                if self.description.is_empty() {
                    errors.push("Project description is required".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Trim, strip backslash escapes, then entity-encode `& < > " '`.
pub fn sanitize_input(input: &str) -> String {
    let unslashed = strip_slashes(input.trim());
    html_escape::encode_quoted_attribute(&unslashed).into_owned()
}

/// `\x` becomes `x`, `\\` becomes `\`, a trailing lone backslash is dropped.
fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}
