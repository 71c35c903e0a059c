// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod classifier;
pub mod config;
pub mod mail;
pub mod metrics;
pub mod respond;
pub mod submission;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classifier::{classify, RejectReason, SoftFlag, SubmissionClassifier, Verdict};
pub use crate::config::{AppConfig, SpamPolicy};
pub use crate::submission::{ContactForm, FormType, Submission};

use std::path::PathBuf;
use tracing::info;

pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const ENV_SITE_DIR: &str = "SITE_DIR";
pub const DEFAULT_SITE_DIR: &str = "public";

/// Build the full Router from the environment: config, mail transport,
/// `/metrics` when `METRICS_ENABLED=1`, static site when `SITE_DIR` exists.
pub async fn app() -> anyhow::Result<axum::Router> {
    let state = AppState::from_env()?;

    let metrics = if std::env::var(ENV_METRICS_ENABLED).ok().as_deref() == Some("1") {
        Some(metrics::Metrics::init()?)
    } else {
        None
    };

    let site_dir = std::env::var(ENV_SITE_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR));
    let site_dir = site_dir.is_dir().then_some(site_dir);
    if let Some(dir) = &site_dir {
        info!(target: "api", dir = %dir.display(), "serving static site");
    }

    Ok(api::router_with(
        state,
        api::RouterOptions { metrics, site_dir },
    ))
}
