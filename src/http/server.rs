//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the quotation handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Turn each request into one pipeline invocation

use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::pipeline::Pipeline;
use crate::publish::response::failure_response;
use crate::publish::ResponsePublisher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub shutdown: Shutdown,
}

/// HTTP server for the quotation relay.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server around `pipeline`.
    ///
    /// In-flight invocations are cancelled when `shutdown` triggers.
    pub fn new(pipeline: Pipeline, shutdown: Shutdown) -> Self {
        let state = AppState {
            pipeline: Arc::new(pipeline),
            shutdown: shutdown.clone(),
        };
        Self {
            router: Self::build_router(state),
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/cotacao", get(quotation_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /cotacao`: one fetch, decode, persist and response per request.
async fn quotation_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);
    let request = state
        .pipeline
        .request()
        .with_cancellation(state.shutdown.subscribe());

    let span = tracing::info_span!("quotation", request_id = %request_id);
    let delivery = state
        .pipeline
        .execute(request, &ResponsePublisher)
        .instrument(span)
        .await;

    tracing::info!(
        request_id = %request_id,
        outcome = delivery.outcome.label(),
        bid = ?delivery.outcome.bid(),
        "Quotation request served"
    );

    match delivery.output {
        Some(response) => response,
        None => failure_response(&delivery.outcome),
    }
}
