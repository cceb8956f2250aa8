//! HTTP response rendering for the serving boundary.
//!
//! Status mapping:
//! - fetch timeout, store timeout → 504
//! - fetch transport → 502
//! - malformed payload → 400
//! - store unavailable → 503
//! - store write, publish → 500

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::pipeline::{FailureKind, PipelineOutcome};
use crate::publish::{PublishError, Publisher};
use crate::quoting::BidBody;

/// Publishes an outcome as an axum response.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsePublisher;

impl Publisher for ResponsePublisher {
    type Output = Response;

    fn publish(&self, outcome: &PipelineOutcome) -> Result<Response, PublishError> {
        match outcome {
            PipelineOutcome::Success(settled) => {
                let body = serde_json::to_vec(&BidBody { bid: settled.bid() })?;
                Ok((
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response())
            }
            failure => Ok(failure_response(failure)),
        }
    }
}

pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::FetchTimeout | FailureKind::StoreTimeout => StatusCode::GATEWAY_TIMEOUT,
        FailureKind::FetchTransport => StatusCode::BAD_GATEWAY,
        FailureKind::DecodeMalformed => StatusCode::BAD_REQUEST,
        FailureKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::StoreWrite | FailureKind::PublishFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text error response carrying the failure detail.
pub fn failure_response(outcome: &PipelineOutcome) -> Response {
    let status = outcome
        .failure_kind()
        .map_or(StatusCode::INTERNAL_SERVER_ERROR, status_for);
    (status, outcome.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Settled;
    use crate::quoting::{DecodeError, Quotation};
    use crate::resilience::Interrupt;
    use crate::upstream::FetchError;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_success_renders_bid_json() {
        let outcome = PipelineOutcome::Success(Settled {
            quotation: Quotation::from_bid(5.43),
            persisted: None,
        });

        let response = ResponsePublisher.publish(&outcome).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_text(response).await, r#"{"bid":5.43}"#);
    }

    #[tokio::test]
    async fn test_failures_carry_detail() {
        let outcome = PipelineOutcome::DecodeFailed(DecodeError::InvalidBid("abc".into()));
        let response = ResponsePublisher.publish(&outcome).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("abc"));

        let outcome = PipelineOutcome::FetchFailed(FetchError::Timeout(Interrupt::DeadlineElapsed));
        let response = ResponsePublisher.publish(&outcome).unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(FailureKind::FetchTransport), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(FailureKind::StoreUnavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for(FailureKind::StoreTimeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_for(FailureKind::StoreWrite), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(status_for(FailureKind::DecodeMalformed).is_client_error());
    }
}
