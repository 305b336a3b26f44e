use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::boundary::error::SuggestError;
use crate::page::page_model::AnalysisResult;
use crate::trace::{logger::TraceLogger, trace::RequestTrace};

/// One-shot "response already written" flag for a single request. The first
/// claimer owns the response; everyone else must stay silent. Replaces any
/// implicit reliance on transport-level response state.
#[derive(Clone)]
pub struct ResponseSlot {
    claimed: Arc<AtomicBool>,
}

impl ResponseSlot {
    pub fn new() -> Self {
        Self {
            claimed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true exactly once, for the first caller.
    pub fn try_claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::SeqCst)
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}

impl Default for ResponseSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps one pipeline run in a hard wall-clock budget. The pipeline runs on
/// a worker thread; if the budget elapses first, the boundary claims the
/// response slot and answers with a timeout. The worker is never forcibly
/// aborted; a late result finds the slot claimed and is discarded with a
/// trace entry only.
pub struct RequestBoundary {
    budget: Duration,
}

impl RequestBoundary {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget.as_millis() as u64
    }

    pub fn execute<F>(
        &self,
        job: F,
        tracer: Arc<TraceLogger>,
    ) -> Result<AnalysisResult, SuggestError>
    where
        F: FnOnce() -> Result<AnalysisResult, SuggestError> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let slot = ResponseSlot::new();

        let worker_slot = slot.clone();
        let worker_tracer = tracer.clone();
        thread::spawn(move || {
            let outcome = job();
            if worker_slot.try_claim() {
                // Receiver may already be gone; nothing else to do then
                let _ = tx.send(outcome);
            } else {
                worker_tracer.log(&RequestTrace::stage("late_result_discarded"));
            }
        });

        match rx.recv_timeout(self.budget) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                if slot.try_claim() {
                    tracer.log(
                        &RequestTrace::stage("budget_exceeded")
                            .with_detail(format!("{}ms", self.budget_ms())),
                    );
                    Err(SuggestError::Timeout {
                        budget_ms: self.budget_ms(),
                    })
                } else {
                    // The worker claimed the slot just as we timed out; its
                    // result is in flight and it owns the response.
                    rx.recv().unwrap_or_else(|_| {
                        Err(SuggestError::Upstream(
                            "analysis worker terminated unexpectedly".to_string(),
                        ))
                    })
                }
            }
            Err(RecvTimeoutError::Disconnected) => Err(SuggestError::Upstream(
                "analysis worker terminated unexpectedly".to_string(),
            )),
        }
    }
}
