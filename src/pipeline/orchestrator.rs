//! Pipeline orchestration.
//!
//! # State Machine
//! ```text
//! Idle → Fetching → Decoding → Persisting (optional) → Publishing → Done
//!           │           │            │                      │
//!           └───────────┴────────────┴──────────────────────┴──→ Failed
//! ```
//!
//! # Responsibilities
//! - Derive each stage deadline from the invocation deadline
//! - Stop at the first failing stage, untranslated
//! - Hand the terminal outcome to a publisher
//!
//! # Design Decisions
//! - One attempt per stage, no retries
//! - No state survives an invocation; the pipeline itself is immutable

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::BudgetConfig;
use crate::observability::metrics;
use crate::pipeline::outcome::{PipelineOutcome, Settled};
use crate::publish::Publisher;
use crate::quoting::PayloadDecoder;
use crate::resilience::Deadline;
use crate::storage::QuotationStore;
use crate::upstream::UpstreamClient;

/// Trigger of one invocation.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Invocation deadline; every stage deadline is carved out of it.
    pub deadline: Deadline,
    /// Ambient cancellation, e.g. server shutdown.
    pub cancel: Option<CancellationToken>,
}

impl QuoteRequest {
    pub fn new(budget: Duration) -> Self {
        Self::with_deadline(Deadline::after(budget))
    }

    pub fn with_deadline(deadline: Deadline) -> Self {
        Self {
            deadline,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Invocation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Decoding,
    Persisting,
    Publishing,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Decoding => "decoding",
            Stage::Persisting => "persisting",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

/// Terminal outcome together with whatever the publisher produced.
#[derive(Debug)]
pub struct Delivery<T> {
    pub outcome: PipelineOutcome,
    pub output: Option<T>,
}

/// Fetch → decode → persist chain bound to one upstream.
#[derive(Clone)]
pub struct Pipeline {
    caller: UpstreamClient,
    decoder: Arc<dyn PayloadDecoder>,
    store: Option<QuotationStore>,
    budget: BudgetConfig,
}

impl Pipeline {
    /// Create a pipeline. Without a store the persist stage is skipped.
    pub fn new(
        caller: UpstreamClient,
        decoder: Arc<dyn PayloadDecoder>,
        store: Option<QuotationStore>,
        budget: BudgetConfig,
    ) -> Self {
        Self {
            caller,
            decoder,
            store,
            budget,
        }
    }

    pub fn budget(&self) -> &BudgetConfig {
        &self.budget
    }

    /// A request carrying the full overall budget from now.
    pub fn request(&self) -> QuoteRequest {
        QuoteRequest::new(self.budget.overall())
    }

    /// Run fetch, decode and the optional persist stage.
    pub async fn run(&self, request: &QuoteRequest) -> PipelineOutcome {
        let cancel = request.cancel.as_ref();
        let mut stage = Stage::Idle;

        let fetch_deadline = request.deadline.child(self.budget.fetch_ceiling());
        stage = advance(stage, Stage::Fetching, fetch_deadline);
        let started = Instant::now();
        let fetched = self.caller.fetch(fetch_deadline, cancel).await;
        metrics::record_stage(stage.as_str(), started);
        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => return fail(stage, PipelineOutcome::FetchFailed(e)),
        };

        stage = advance(stage, Stage::Decoding, request.deadline);
        let started = Instant::now();
        let decoded = self.decoder.decode(&raw.body);
        metrics::record_stage(stage.as_str(), started);
        let quotation = match decoded {
            Ok(quotation) => quotation,
            Err(e) => return fail(stage, PipelineOutcome::DecodeFailed(e)),
        };
        drop(raw);

        let persisted = match &self.store {
            Some(store) => {
                let store_deadline = request.deadline.child(self.budget.store_ceiling());
                stage = advance(stage, Stage::Persisting, store_deadline);
                let started = Instant::now();
                let persisted = store.persist(&quotation, store_deadline, cancel).await;
                metrics::record_stage(stage.as_str(), started);
                match persisted {
                    Ok(record) => Some(record),
                    Err(e) => return fail(stage, PipelineOutcome::StoreFailed(e)),
                }
            }
            None => None,
        };

        PipelineOutcome::Success(Settled {
            quotation,
            persisted,
        })
    }

    /// Run the chain and hand the outcome to `publisher`.
    ///
    /// A publisher error turns a success into `PublishFailed`; on a failure
    /// outcome the original tag is kept.
    pub async fn execute<P: Publisher>(
        &self,
        request: QuoteRequest,
        publisher: &P,
    ) -> Delivery<P::Output> {
        let outcome = self.run(&request).await;

        let previous = match (&outcome, &self.store) {
            (PipelineOutcome::Success(_), Some(_)) => Stage::Persisting,
            (PipelineOutcome::Success(_), None) => Stage::Decoding,
            _ => Stage::Failed,
        };
        let stage = advance(previous, Stage::Publishing, request.deadline);
        let started = Instant::now();
        let delivery = match publisher.publish(&outcome) {
            Ok(output) => Delivery {
                outcome,
                output: Some(output),
            },
            Err(error) => match outcome {
                PipelineOutcome::Success(settled) => {
                    tracing::error!(error = %error, "Publishing failed after successful fetch");
                    Delivery {
                        outcome: PipelineOutcome::PublishFailed { error, settled },
                        output: None,
                    }
                }
                outcome => {
                    tracing::debug!(
                        outcome = outcome.label(),
                        error = %error,
                        "Publisher withheld failure outcome"
                    );
                    Delivery {
                        outcome,
                        output: None,
                    }
                }
            },
        };
        metrics::record_stage(stage.as_str(), started);

        let terminal = if delivery.outcome.is_success() {
            Stage::Done
        } else {
            Stage::Failed
        };
        tracing::debug!(from = stage.as_str(), to = terminal.as_str(), outcome = delivery.outcome.label(), "Pipeline finished");
        metrics::record_outcome(delivery.outcome.label());
        delivery
    }
}

fn advance(from: Stage, to: Stage, deadline: Deadline) -> Stage {
    tracing::debug!(
        from = from.as_str(),
        to = to.as_str(),
        remaining_ms = deadline.remaining().as_millis() as u64,
        "Pipeline transition"
    );
    to
}

fn fail(stage: Stage, outcome: PipelineOutcome) -> PipelineOutcome {
    tracing::warn!(
        stage = stage.as_str(),
        outcome = outcome.label(),
        error = %outcome,
        "Pipeline stage failed"
    );
    outcome
}
