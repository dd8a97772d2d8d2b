//! Per-trap relay pipeline
//!
//! Classify, format, resolve and deliver, in that order. Each trap is handled
//! exactly once and its outcome is only ever logged; nothing is retried.

use crate::classifier::classify;
use crate::config::Config;
use crate::formatter::format_alert;
use crate::trap::TrapEvent;
use crate::webhook_notifier::WebhookNotifier;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, Instrument};

/// Terminal result of handling one trap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapOutcome {
    Delivered { severity: String, endpoint: String },
    DeliveryFailed { severity: String, endpoint: String, cause: String },
    Unroutable { severity: String },
}

pub struct TrapHandler {
    config: Config,
    notifier: WebhookNotifier,
}

impl TrapHandler {
    pub fn new(config: Config, notifier: WebhookNotifier) -> Self {
        Self { config, notifier }
    }

    /// Relay a single trap to its webhook
    pub async fn handle(&self, event: TrapEvent) -> TrapOutcome {
        info!("Received SNMP trap {} from {}", event.id, event.sender);
        debug!(
            "Trap {} received at {} with {} variable binding(s)",
            event.id,
            event.received_at.to_rfc3339(),
            event.trap.variables.len()
        );

        let severity = classify(&event.trap);
        let message = format_alert(&event.trap, &event.sender);

        let endpoint = match self.config.resolve_webhook(&severity) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                error!("Dropping trap {} from {}: {}", event.id, event.sender, e);
                return TrapOutcome::Unroutable { severity };
            }
        };

        let outcome = self.notifier.deliver(endpoint, &message).await;
        if outcome.success {
            info!(
                "Trap {} sent via [{}] webhook successfully ({})",
                event.id, severity, outcome.detail
            );
            TrapOutcome::Delivered {
                severity,
                endpoint: endpoint.to_string(),
            }
        } else {
            error!(
                "Error sending trap {} via [{}] webhook: {}",
                event.id, severity, outcome.detail
            );
            TrapOutcome::DeliveryFailed {
                severity,
                endpoint: endpoint.to_string(),
                cause: outcome.detail,
            }
        }
    }

    /// Consume trap events until the channel closes, one task per trap
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<TrapEvent>) {
        info!("Trap handler started with {} webhook(s)", self.config.webhooks.len());

        while let Some(event) = events.recv().await {
            let handler = Arc::clone(&self);
            let span = tracing::info_span!("trap", id = %event.id);
            tokio::spawn(
                async move {
                    handler.handle(event).await;
                }
                .instrument(span),
            );
        }

        debug!("Trap event channel closed, handler stopping");
    }
}
