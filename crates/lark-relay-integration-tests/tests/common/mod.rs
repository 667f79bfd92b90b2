//! Common test utilities for lark-relay-api integration tests
//!
//! This module provides:
//! - A recording [`CardDelivery`] double
//! - App state builders
//! - Signed webhook request builders and GitHub payload fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request};
use hmac::{Hmac, Mac};
use lark_relay_api::{AppState, CardDelivery, DeliveryError, ServiceConfig, ServiceMetrics};
use lark_relay_core::Card;
use sha2::Sha256;
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "It's a Secret to Everybody";

// ============================================================================
// Mock Card Delivery
// ============================================================================

/// Records every card it is asked to deliver
#[derive(Default)]
pub struct RecordingDelivery {
    cards: Mutex<Vec<Card>>,
    failure: Mutex<Option<DeliveryError>>,
}

impl RecordingDelivery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer the next delivery with `error`
    pub fn fail_next(&self, error: DeliveryError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.cards.lock().unwrap().len()
    }

    /// Card text of the single delivered card, joined line by line
    pub fn only_card_text(&self) -> String {
        let cards = self.cards();
        assert_eq!(cards.len(), 1, "expected exactly one delivered card");
        card_text(&cards[0])
    }
}

#[async_trait]
impl CardDelivery for RecordingDelivery {
    async fn deliver(&self, card: Card) -> Result<(), DeliveryError> {
        self.cards.lock().unwrap().push(card);
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// All text content of a card's body elements
pub fn card_text(card: &Card) -> String {
    card.elements
        .iter()
        .filter_map(|e| e.text())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// App State
// ============================================================================

/// App state with signature enforcement and a recording delivery target
pub fn create_test_app_state(delivery: Arc<RecordingDelivery>) -> AppState {
    let mut config = ServiceConfig::default();
    config.github.secret = Some(TEST_SECRET.to_string());
    create_app_state_with_config(config, Some(delivery))
}

pub fn create_app_state_with_config(
    config: ServiceConfig,
    delivery: Option<Arc<RecordingDelivery>>,
) -> AppState {
    AppState::new(
        config,
        delivery.map(|d| d as Arc<dyn CardDelivery>),
        ServiceMetrics::new().unwrap(),
    )
}

// ============================================================================
// Requests
// ============================================================================

pub fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SECRET.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Headers GitHub sends with a signed delivery
pub fn signed_headers(event: &str, body: &[u8]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-github-event", HeaderValue::from_str(event).unwrap());
    headers.insert(
        "x-github-delivery",
        HeaderValue::from_static("72d3162e-cc78-11e3-81ab-4c9367dc0958"),
    );
    headers.insert(
        "x-hub-signature-256",
        HeaderValue::from_str(&sign(body)).unwrap(),
    );
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers
}

/// A signed `POST` to `uri`
pub fn signed_request(uri: &str, event: &str, payload: &serde_json::Value) -> Request<Body> {
    let body = serde_json::to_vec(payload).unwrap();
    let mut builder = Request::builder().method("POST").uri(uri);
    for (name, value) in signed_headers(event, &body).iter() {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(body)).unwrap()
}

// ============================================================================
// Payload Fixtures
// ============================================================================

pub fn repository() -> serde_json::Value {
    serde_json::json!({ "id": 1296269, "full_name": "octo/relay", "private": false })
}

pub fn commit(id: usize, message: &str, author: &str) -> serde_json::Value {
    serde_json::json!({
        "id": format!("{:040x}", id),
        "message": message,
        "url": format!("https://github.com/octo/relay/commit/{:040x}", id),
        "author": { "name": author, "email": format!("{}@example.com", author) }
    })
}

pub fn push_payload(commits: Vec<serde_json::Value>) -> serde_json::Value {
    let head = commits.last().cloned().unwrap_or(serde_json::Value::Null);
    serde_json::json!({
        "ref": "refs/heads/main",
        "before": "0000000000000000000000000000000000000000",
        "after": "1111111111111111111111111111111111111111",
        "repository": repository(),
        "pusher": { "name": "octocat", "email": "octocat@example.com" },
        "commits": commits,
        "head_commit": head,
        "compare": "https://github.com/octo/relay/compare/000000...111111"
    })
}

pub fn issues_payload(action: &str, body: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "issue": {
            "number": 42,
            "title": "Cards render twice",
            "html_url": "https://github.com/octo/relay/issues/42",
            "body": body,
            "state": "open"
        },
        "repository": repository(),
        "sender": { "login": "hubot", "id": 2 }
    })
}

pub fn pull_request_payload(action: &str, merged: bool) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "number": 7,
        "pull_request": {
            "number": 7,
            "title": "Sign outgoing cards",
            "html_url": "https://github.com/octo/relay/pull/7",
            "body": "Adds the timestamp/sign pair.",
            "head": { "ref": "feature/sign", "sha": "abc" },
            "base": { "ref": "main", "sha": "def" },
            "merged": merged
        },
        "repository": repository(),
        "sender": { "login": "mona", "id": 3 }
    })
}

pub fn release_payload(action: &str) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "release": {
            "tag_name": "v1.2.0",
            "name": "Spring release",
            "html_url": "https://github.com/octo/relay/releases/tag/v1.2.0",
            "body": "Highlights:\n- signed cards",
            "author": { "login": "octocat", "id": 1 }
        },
        "repository": repository()
    })
}
