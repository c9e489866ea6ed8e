//! Denial audit log

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

const ARGS_SUMMARY_MAX_CHARS: usize = 200;

/// One denied tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialRecord {
    pub agent: String,
    pub tool: String,
    /// Capability class of the tool, e.g. `file:write`
    pub class: String,
    pub args_summary: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Entries {
    records: VecDeque<DenialRecord>,
    total: u64,
}

/// Bounded, thread-safe log of denials; oldest entries are evicted first
#[derive(Debug)]
pub struct AuditLog {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}

impl AuditLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(Entries {
                records: VecDeque::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY)),
                total: 0,
            }),
        }
    }

    pub fn shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, record: DenialRecord) {
        let mut entries = self.entries.lock();
        if entries.records.len() == self.capacity {
            entries.records.pop_front();
        }
        entries.records.push_back(record);
        entries.total += 1;
    }

    /// Copy of the retained records, oldest first
    pub fn snapshot(&self) -> Vec<DenialRecord> {
        self.entries.lock().records.iter().cloned().collect()
    }

    /// Remove and return the retained records
    pub fn drain(&self) -> Vec<DenialRecord> {
        self.entries.lock().records.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().records.is_empty()
    }

    /// Denials recorded since creation, evicted ones included
    pub fn total_denials(&self) -> u64 {
        self.entries.lock().total
    }
}

/// Compact one-line rendering of tool arguments
pub fn summarize_args(args: &serde_json::Value) -> String {
    let rendered = match args {
        serde_json::Value::Null => return String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if rendered.chars().count() <= ARGS_SUMMARY_MAX_CHARS {
        return rendered;
    }
    let truncated: String = rendered.chars().take(ARGS_SUMMARY_MAX_CHARS).collect();
    format!("{truncated}...")
}
