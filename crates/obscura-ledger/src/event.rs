//! # Event Log
//!
//! In-memory, append-only record of emitted [`LedgerEvent`]s, numbered in
//! emission order. Lives as long as the ledger instance.

use obscura_core::LedgerEvent;
use serde::{Deserialize, Serialize};

/// An emitted event with its position in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based emission index.
    pub sequence: u64,
    /// The event.
    pub event: LedgerEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event`; returns its sequence number.
    pub fn push(&mut self, event: LedgerEvent) -> u64 {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord { sequence, event });
        tracing::debug!(sequence, event = %event, "event emitted");
        sequence
    }

    /// All records in emission order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Number of events emitted.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
