// src/metrics.rs
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::classifier::Verdict;

pub const SUBMISSIONS_TOTAL: &str = "contact_form_submissions_total";
pub const SPAM_BLOCKED_TOTAL: &str = "contact_form_spam_blocked_total";
pub const DELIVERY_FAILURES_TOTAL: &str = "contact_form_delivery_failures_total";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls reuse it.
    pub fn init() -> Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("prometheus: install recorder")?;
                describe_counter!(SUBMISSIONS_TOTAL, "Form submissions by outcome");
                describe_counter!(SPAM_BLOCKED_TOTAL, "Silently rejected submissions by reason");
                describe_counter!(DELIVERY_FAILURES_TOTAL, "SMTP delivery failures");
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Count one classified submission. No-op until a recorder is installed.
pub fn record_verdict(verdict: &Verdict) {
    match verdict {
        Verdict::Reject(r) => {
            counter!(SUBMISSIONS_TOTAL, "outcome" => "rejected").increment(1);
            counter!(SPAM_BLOCKED_TOTAL, "reason" => r.reason.as_str()).increment(1);
        }
        Verdict::Accept { flag: Some(_) } => {
            counter!(SUBMISSIONS_TOTAL, "outcome" => "flagged").increment(1);
        }
        Verdict::Accept { flag: None } => {
            counter!(SUBMISSIONS_TOTAL, "outcome" => "accepted").increment(1);
        }
    }
}

pub fn record_delivery_failure() {
    counter!(DELIVERY_FAILURES_TOTAL).increment(1);
}
