//! Batch outcome accounting - per-URL results, progress, and summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FailureKind;

/// Result of one URL inside a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// The URL as submitted to the batch.
    pub url: String,

    /// Whether the scrape produced and persisted an item.
    pub ok: bool,

    /// Failure classification when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureKind>,
}

impl IngestOutcome {
    /// A successful outcome.
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ok: true,
            error: None,
        }
    }

    /// A failed outcome with its classification.
    pub fn failure(url: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            url: url.into(),
            ok: false,
            error: Some(kind),
        }
    }
}

/// Progress through a batch, reported once per completed item.
///
/// `completed` increases monotonically within a run and ends equal to
/// `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Items finished so far (success or failure).
    pub completed: usize,

    /// Items in the batch.
    pub total: usize,
}

impl Progress {
    /// Completion as a whole percentage (0-100). Empty batches read 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

/// Terminal classification of a batch run.
///
/// Callers make different UI/retry decisions per state, so the distinction
/// is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Every URL succeeded (or the batch was empty).
    Completed,

    /// Some URLs succeeded, some failed.
    CompletedWithFailures { failed: usize },

    /// Not a single URL succeeded.
    AllFailed,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Completed => f.write_str("completed"),
            BatchStatus::CompletedWithFailures { failed } => {
                write!(f, "completed with {failed} failure(s)")
            }
            BatchStatus::AllFailed => f.write_str("all failed"),
        }
    }
}

/// Accumulated result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// URLs that produced a persisted item.
    pub succeeded: usize,

    /// URLs that failed anywhere in the pipeline.
    pub failed: usize,

    /// URLs the batch was started with.
    pub total: usize,

    /// Per-URL outcomes in run order.
    pub outcomes: Vec<IngestOutcome>,
}

impl BatchSummary {
    /// Create an empty summary for a batch of `total` URLs.
    pub fn new(total: usize) -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            total,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Record one outcome, updating the counters.
    pub fn record(&mut self, outcome: IngestOutcome) {
        if outcome.ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// How many items have finished so far.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Terminal classification.
    ///
    /// `succeeded == 0 && total > 0` is a hard failure; failures alongside
    /// successes are a partial success; no failures is full success.
    pub fn status(&self) -> BatchStatus {
        if self.total > 0 && self.succeeded == 0 {
            BatchStatus::AllFailed
        } else if self.failed > 0 {
            BatchStatus::CompletedWithFailures {
                failed: self.failed,
            }
        } else {
            BatchStatus::Completed
        }
    }

    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
