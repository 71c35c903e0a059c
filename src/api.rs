// src/api.rs
//! HTTP surface: health probe and the contact-form endpoint.
//!
//! `POST /send_email` order: mail configured -> validate -> classify ->
//! respond (audit + reply) -> deliver. Spam gets the success reply and is
//! never handed to the mailer.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::classifier::SubmissionClassifier;
use crate::config::{audit_salt, AppConfig, FormSettings, SmtpSettings};
use crate::mail::{compose, LogMailer, Mailer, SmtpMailer};
use crate::metrics::{self, Metrics};
use crate::respond::{respond, FormReply};
use crate::submission::{ContactForm, Submission};

pub const ENV_MAIL_TRANSPORT: &str = "MAIL_TRANSPORT";

pub const MSG_NOT_CONFIGURED: &str =
    "Email system not configured properly. Please contact the administrator.";
pub const MSG_SEND_FAILED: &str =
    "Sorry, there was an error sending your message. Please try again later.";
pub const MSG_BAD_REQUEST: &str = "Invalid form submission";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";

#[derive(Clone)]
pub struct AppState {
    pub form: Arc<FormSettings>,
    pub classifier: SubmissionClassifier,
    /// `None` when SMTP settings are missing or invalid; the endpoint answers 500.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub audit_salt: Arc<str>,
}

impl AppState {
    /// Fails when a keyword in the spam policy cannot be compiled.
    pub fn new(
        config: AppConfig,
        mailer: Option<Arc<dyn Mailer>>,
        audit_salt: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            form: Arc::new(config.form),
            classifier: SubmissionClassifier::new(config.spam)?,
            mailer,
            audit_salt: Arc::from(audit_salt),
        })
    }

    /// Config file + env overrides, transport picked by `MAIL_TRANSPORT` (`smtp` | `log`).
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::load()?;

        let transport = std::env::var(ENV_MAIL_TRANSPORT)
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mailer: Option<Arc<dyn Mailer>> = if transport == "log" {
            warn!(target: "mail", "MAIL_TRANSPORT=log, submissions will not be emailed");
            Some(Arc::new(LogMailer))
        } else {
            match SmtpSettings::from_env().and_then(|s| SmtpMailer::new(&s)) {
                Ok(m) => Some(Arc::new(m)),
                Err(e) => {
                    error!(target: "mail", error = ?e, "SMTP not configured, form endpoint will fail");
                    None
                }
            }
        };

        if !config.spam.enabled {
            warn!(target: "spam", "spam filter disabled");
        }

        Self::new(config, mailer, &audit_salt())
    }
}

/// Optional extras mounted next to the form endpoint.
#[derive(Default)]
pub struct RouterOptions {
    pub metrics: Option<Metrics>,
    /// Pre-built marketing site served for any other path.
    pub site_dir: Option<PathBuf>,
}

pub fn router(state: AppState) -> Router {
    router_with(state, RouterOptions::default())
}

pub fn router_with(state: AppState, opts: RouterOptions) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/send_email",
            post(send_email).fallback(method_not_allowed),
        );

    if let Some(m) = &opts.metrics {
        app = app.merge(m.router());
    }
    if let Some(dir) = opts.site_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}

type Reply = (StatusCode, Json<FormReply>);

fn reply(status: StatusCode, body: FormReply) -> Reply {
    (status, Json(body))
}

async fn method_not_allowed() -> Reply {
    reply(
        StatusCode::METHOD_NOT_ALLOWED,
        FormReply::error(MSG_METHOD_NOT_ALLOWED),
    )
}

async fn send_email(
    State(state): State<AppState>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Reply {
    let Some(mailer) = state.mailer.clone() else {
        error!(target: "api", "form submission received but mail transport is not configured");
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            FormReply::error(MSG_NOT_CONFIGURED),
        );
    };

    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => {
            warn!(target: "api", error = %e, "unparseable form body");
            return reply(StatusCode::BAD_REQUEST, FormReply::error(MSG_BAD_REQUEST));
        }
    };

    let submission = Submission::from(form);
    if let Err(errors) = submission.validate() {
        return reply(StatusCode::BAD_REQUEST, FormReply::error(errors.join(", ")));
    }

    let verdict = state.classifier.classify(&submission);
    metrics::record_verdict(&verdict);

    let outcome = respond(
        &submission,
        &verdict,
        &state.form,
        state.classifier.policy(),
        &state.audit_salt,
    );
    if let Some(audit) = &outcome.audit {
        audit.emit();
    }
    if !outcome.deliver {
        return reply(outcome.status, outcome.reply);
    }

    let mail = compose(&submission, &state.form, &chrono::Local::now());
    match mailer.send(mail).await {
        Ok(()) => {
            info!(target: "api", form = submission.form_type.as_str(), "submission delivered");
            reply(outcome.status, outcome.reply)
        }
        Err(e) => {
            error!(target: "mail", error = ?e, "Email sending failed");
            metrics::record_delivery_failure();
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                FormReply::error(MSG_SEND_FAILED),
            )
        }
    }
}
