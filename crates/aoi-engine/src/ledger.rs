//! Bounded, ordered record of analysis outcomes.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use aoi_ipc::{AnalysisOutcome, LedgerEntry, PendingEntry};

/// Completed entries the ledger retains.
pub const MAX_COMPLETED_ENTRIES: usize = 10;

/// Newest-first record of completed outcomes plus the at-most-one
/// in-flight placeholder.
///
/// The placeholder never counts against the completed bound, and no
/// completed entry is mutated after it is appended.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    completed: VecDeque<LedgerEntry>,
    pending: Option<PendingEntry>,
}

impl HistoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the in-flight placeholder, replacing any prior one.
    pub fn set_pending(&mut self, captured_at: DateTime<Utc>) {
        self.pending = Some(PendingEntry { captured_at });
    }

    /// Drop the in-flight placeholder without recording an outcome.
    /// Used when a late result from a cancelled session is discarded.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Replace the pending placeholder with its settled outcome.
    ///
    /// The oldest completed entry is evicted once the bound is
    /// reached. Tolerates a missing placeholder so a redundant call
    /// cannot lose an outcome.
    pub fn resolve_pending(&mut self, outcome: AnalysisOutcome) {
        let captured_at = self
            .pending
            .take()
            .map(|p| p.captured_at)
            .unwrap_or_else(Utc::now);

        self.completed.push_front(LedgerEntry {
            captured_at,
            completed_at: Utc::now(),
            outcome,
        });
        self.completed.truncate(MAX_COMPLETED_ENTRIES);
    }

    /// Completed entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.completed.iter()
    }

    /// The in-flight placeholder, if any.
    pub fn pending(&self) -> Option<&PendingEntry> {
        self.pending.as_ref()
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Whether the ledger holds no completed entries.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Owned snapshot for an event payload.
    pub fn snapshot(&self) -> (Vec<LedgerEntry>, Option<PendingEntry>) {
        (self.completed.iter().cloned().collect(), self.pending)
    }
}
