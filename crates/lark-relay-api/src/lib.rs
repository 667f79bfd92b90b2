//! # Lark Relay HTTP Service
//!
//! HTTP server that receives GitHub webhooks and forwards them to a Feishu
//! (Lark) group as interactive cards.
//!
//! This service provides:
//! - GitHub webhook endpoints (`POST /` and the configured path) with
//!   `X-Hub-Signature-256` validation
//! - Health endpoints reporting which settings are present
//! - A Prometheus metrics endpoint

pub mod config;
pub mod delivery;
pub mod errors;
pub mod metrics;
pub mod responses;

pub use config::{FeishuConfig, GithubConfig, LoggingConfig, ServerConfig, ServiceConfig};
pub use delivery::{CardDelivery, FeishuWebhookClient};
pub use errors::{ConfigError, DeliveryError, ServiceError, WebhookHandlerError};
pub use metrics::ServiceMetrics;
pub use responses::{ConfigStatus, HealthResponse, SettingStatus, WebhookResponse};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use lark_relay_core::{
    dispatch,
    webhook::{DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER},
    Dispatch, EventKind, GithubSignatureValidator,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

/// Header carrying the per-request correlation ID
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub validator: GithubSignatureValidator,
    pub delivery: Option<Arc<dyn CardDelivery>>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Assemble state around an existing delivery target.
    ///
    /// `delivery` is `None` when no Feishu webhook URL is configured; webhooks
    /// are then refused with `500`.
    pub fn new(
        config: ServiceConfig,
        delivery: Option<Arc<dyn CardDelivery>>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        let validator = GithubSignatureValidator::new(config.github.secret.clone());

        Self {
            config: Arc::new(config),
            validator,
            delivery,
            metrics,
        }
    }

    /// Build state with a [`FeishuWebhookClient`] taken from configuration.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        let metrics = ServiceMetrics::new().map_err(|e| {
            ServiceError::Configuration(ConfigError::Invalid {
                message: format!("Failed to initialize metrics: {}", e),
            })
        })?;

        let delivery = FeishuWebhookClient::from_config(&config.feishu)
            .map_err(|e| {
                ServiceError::Configuration(ConfigError::Invalid {
                    message: e.to_string(),
                })
            })?
            .map(|client| Arc::new(client) as Arc<dyn CardDelivery>);

        Ok(Self::new(config, delivery, metrics))
    }

    /// Which settings are present, for the health endpoints
    pub fn config_status(&self) -> ConfigStatus {
        ConfigStatus {
            feishu_webhook_url: SettingStatus::of(&self.delivery),
            github_secret: SettingStatus::of(&self.config.github.secret),
            feishu_secret: SettingStatus::of(&self.config.feishu.secret),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let mut webhook_routes =
        Router::new().route("/", get(handle_health_check).post(handle_webhook));
    if state.config.webhooks.endpoint_path != "/" {
        webhook_routes =
            webhook_routes.route(&state.config.webhooks.endpoint_path, post(handle_webhook));
    }

    let health_routes = Router::new().route("/health", get(handle_health_check));

    let observability_routes = Router::new().route("/metrics", get(metrics_endpoint));

    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .merge(webhook_routes)
        .merge(health_routes)
        .merge(observability_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(DefaultBodyLimit::max(max_body_size))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Serves until SIGINT or SIGTERM, then lets in-flight requests finish for
/// at most `server.shutdown_timeout_seconds`.
pub async fn start_server(state: AppState) -> Result<(), ServiceError> {
    let config = state.config.clone();
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.clone(),
                message: e.to_string(),
            })?;

    info!(address = %addr, "Starting HTTP server");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let shutdown_started = Arc::new(tokio::sync::Notify::new());

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_started.clone(), shutdown_timeout));

    // Bound the drain: the server future only completes once every
    // connection has closed.
    let drain_deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = drain_deadline => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out; dropping remaining connections"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

async fn shutdown_signal(started: Arc<tokio::sync::Notify>, timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", timeout.as_secs());
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", timeout.as_secs());
        },
    }

    started.notify_one();
}

// ============================================================================
// Webhook Handlers
// ============================================================================

/// Handle GitHub webhook requests
///
/// 1. Refuse with `500` when there is no Feishu webhook URL
/// 2. Validate `X-Hub-Signature-256` over the raw body (`401` on failure)
/// 3. Parse and format according to `X-GitHub-Event` (`400` when malformed)
/// 4. Post the card to Feishu
///
/// Delivery failures are logged and counted but still answered with `200`:
/// the webhook itself was valid, and a GitHub redelivery would not help.
#[instrument(skip(state, headers, body), fields(event_type, delivery_id))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookHandlerError> {
    let event_type = header_str(&headers, EVENT_HEADER);
    let kind = EventKind::from_header(event_type);

    let span = tracing::Span::current();
    span.record("event_type", kind.as_str());
    span.record(
        "delivery_id",
        header_str(&headers, DELIVERY_HEADER).unwrap_or("-"),
    );

    info!(body_bytes = body.len(), "Received webhook request");

    let Some(delivery) = state.delivery.clone() else {
        return Err(WebhookHandlerError::NotConfigured {
            key: "FEISHU_WEBHOOK_URL".to_string(),
        });
    };

    state
        .metrics
        .webhook_requests_total
        .with_label_values(&[metric_label(&kind)])
        .inc();

    if let Err(e) = state
        .validator
        .validate(&body, header_str(&headers, SIGNATURE_HEADER))
    {
        state.metrics.signature_validation_failures.inc();
        return Err(lark_relay_core::WebhookError::from(e).into());
    }

    let outcome =
        dispatch(event_type, &body).inspect_err(|_| state.metrics.malformed_payloads.inc())?;

    let response = match outcome {
        Dispatch::Card(card) => {
            let title = card.title().to_string();
            let timer = state.metrics.card_delivery_duration.start_timer();
            let result = delivery.deliver(card).await;
            timer.observe_duration();

            match result {
                Ok(()) => {
                    state.metrics.cards_delivered.inc();
                    info!(title = %title, "Delivered card to Feishu");
                    WebhookResponse::delivered(&kind)
                }
                Err(e) => {
                    state.metrics.card_delivery_failures.inc();
                    error!(title = %title, error = %e, "Failed to deliver card to Feishu");
                    WebhookResponse::delivery_failed(&kind)
                }
            }
        }
        Dispatch::Pong => {
            info!("Received ping; webhook is configured");
            WebhookResponse::pong()
        }
        Dispatch::Ignored { .. } => {
            info!("No formatter for event type; ignoring");
            WebhookResponse::ignored(&kind)
        }
        Dispatch::Skipped { action, .. } => {
            info!(action = %action, "Action produces no card; skipping");
            WebhookResponse::skipped(&kind, &action)
        }
    };

    Ok(Json(response))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Label for the per-event counter; unknown names share one label so the
/// header cannot grow the series set.
fn metric_label(kind: &EventKind) -> &str {
    match kind {
        EventKind::Other(_) | EventKind::Missing => "other",
        known => known.as_str(),
    }
}

// ============================================================================
// Health Check Handlers
// ============================================================================

/// Health check endpoint
///
/// Always answers `200`; the body's `status` says whether cards can be
/// delivered.
#[instrument(skip(state))]
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_status(state.config_status()))
}

// ============================================================================
// Observability Handlers
// ============================================================================

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.render().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation IDs
///
/// - Reuses an incoming `x-correlation-id` or generates a UUID
/// - Logs request start and completion with structured fields
/// - Echoes the correlation ID on the response
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
