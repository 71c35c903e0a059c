// src/respond.rs
//! Verdict -> (audit record, HTTP reply).
//!
//! A rejected submission gets exactly the same status and JSON shape as a
//! delivered one, so automated senders learn nothing from the response.
//! Audit records carry a salted, truncated hash of the sender address instead
//! of the address itself.

use axum::http::StatusCode;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::classifier::Verdict;
use crate::config::{FormSettings, SpamPolicy};
use crate::submission::Submission;

pub const REVIEW_TAG: &str = "LOW-REVIEW";

/// JSON body returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReply {
    pub success: bool,
    pub message: String,
}

impl FormReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Blocked,
    Allowed,
}

/// One line in the spam audit log. Never holds the raw address or message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub submission_id: String,
    pub tag: String,
    pub detail: String,
    pub form: &'static str,
    pub status: AuditStatus,
}

impl AuditRecord {
    pub fn emit(&self) {
        match self.status {
            AuditStatus::Blocked => warn!(
                target: "spam",
                id = %self.submission_id,
                reason = %self.tag,
                detail = %self.detail,
                form = self.form,
                "spam blocked"
            ),
            AuditStatus::Allowed => info!(
                target: "spam",
                id = %self.submission_id,
                reason = %self.tag,
                detail = %self.detail,
                form = self.form,
                status = "ALLOWED",
                "spam flagged for review"
            ),
        }
    }
}

/// What the handler should do with a classified submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: StatusCode,
    pub reply: FormReply,
    pub audit: Option<AuditRecord>,
    /// False for silent rejects: reply as if sent, but never hand to the mailer.
    pub deliver: bool,
}

/// First 12 hex chars of `sha256(salt + lowercase(email))`. Lets the audit log
/// correlate repeat senders without storing the address; the salt keeps ids
/// from matching across deployments.
pub fn submission_id(salt: &str, email: &str) -> String {
    let digest = Sha256::new()
        .chain_update(salt)
        .chain_update(email.to_lowercase())
        .finalize();
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

pub fn respond(
    submission: &Submission,
    verdict: &Verdict,
    form: &FormSettings,
    policy: &SpamPolicy,
    salt: &str,
) -> Outcome {
    let id = || submission_id(salt, &submission.email.sanitized);
    let form_name = submission.form_type.as_str();

    match verdict {
        Verdict::Reject(r) => Outcome {
            status: StatusCode::OK,
            reply: FormReply::ok(policy.rejection_message.clone()),
            audit: Some(AuditRecord {
                submission_id: id(),
                tag: r.reason.as_str().to_string(),
                detail: r.detail.clone(),
                form: form_name,
                status: AuditStatus::Blocked,
            }),
            deliver: false,
        },
        Verdict::Accept { flag } => Outcome {
            status: StatusCode::OK,
            reply: FormReply::ok(form.success_message.clone()),
            audit: flag.as_ref().map(|f| AuditRecord {
                submission_id: id(),
                tag: REVIEW_TAG.to_string(),
                detail: format!(
                    "{}/{} matches: {}",
                    f.matches.len(),
                    f.threshold,
                    f.matches.join(", ")
                ),
                form: form_name,
                status: AuditStatus::Allowed,
            }),
            deliver: true,
        },
    }
}
