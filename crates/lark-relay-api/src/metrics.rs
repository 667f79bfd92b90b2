//! Metrics collection for the relay.
//!
//! Each [`ServiceMetrics`] owns its own [`Registry`], so building several
//! application states (as tests do) never trips duplicate registration.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Service metrics for observability
#[derive(Debug)]
pub struct ServiceMetrics {
    registry: Registry,

    // Inbound webhook metrics
    pub webhook_requests_total: IntCounterVec,
    pub signature_validation_failures: IntCounter,
    pub malformed_payloads: IntCounter,

    // Outbound delivery metrics
    pub cards_delivered: IntCounter,
    pub card_delivery_failures: IntCounter,
    pub card_delivery_duration: Histogram,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new_custom(Some("lark_relay".to_string()), None)?;

        let webhook_requests_total = IntCounterVec::new(
            Opts::new("webhook_requests_total", "Webhook requests received"),
            &["event"],
        )?;
        let signature_validation_failures = IntCounter::new(
            "signature_validation_failures_total",
            "Webhooks rejected for an invalid signature",
        )?;
        let malformed_payloads = IntCounter::new(
            "malformed_payloads_total",
            "Webhooks rejected for a malformed payload",
        )?;
        let cards_delivered =
            IntCounter::new("cards_delivered_total", "Cards accepted by Feishu")?;
        let card_delivery_failures = IntCounter::new(
            "card_delivery_failures_total",
            "Cards that could not be delivered to Feishu",
        )?;
        let card_delivery_duration = Histogram::with_opts(
            HistogramOpts::new(
                "card_delivery_duration_seconds",
                "Time spent posting cards to Feishu",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(webhook_requests_total.clone()))?;
        registry.register(Box::new(signature_validation_failures.clone()))?;
        registry.register(Box::new(malformed_payloads.clone()))?;
        registry.register(Box::new(cards_delivered.clone()))?;
        registry.register(Box::new(card_delivery_failures.clone()))?;
        registry.register(Box::new(card_delivery_duration.clone()))?;

        Ok(Arc::new(Self {
            registry,
            webhook_requests_total,
            signature_validation_failures,
            malformed_payloads,
            cards_delivered,
            card_delivery_failures,
            card_delivery_duration,
        }))
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
