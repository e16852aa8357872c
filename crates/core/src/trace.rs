use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::AgentId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinationTraceEntry {
    pub entry_id: String,
    pub correlation_id: String,
    pub timestamp: DateTime<Utc>,
    pub from: AgentId,
    pub to: AgentId,
    pub summary: String,
}

impl CoordinationTraceEntry {
    pub fn new(
        correlation_id: impl Into<String>,
        from: AgentId,
        to: AgentId,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4().to_string(),
            correlation_id: correlation_id.into(),
            timestamp: Utc::now(),
            from,
            to,
            summary: summary.into(),
        }
    }

    /// One-line rendering, e.g. `[10:42:07] RouterAgent -> SupportAgent: handle_query ...`.
    pub fn render(&self) -> String {
        format!(
            "[{}] {} -> {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.from,
            self.to,
            self.summary
        )
    }
}

/// Append-only log of inter-agent messages, owned by a single orchestrator.
#[derive(Clone, Debug, Default)]
pub struct CoordinationTrace {
    entries: Vec<CoordinationTraceEntry>,
}

impl CoordinationTrace {
    pub fn record(&mut self, entry: CoordinationTraceEntry) {
        // Wall clocks can step backwards; keep the log monotonic.
        let entry = match self.entries.last() {
            Some(last) if entry.timestamp < last.timestamp => {
                CoordinationTraceEntry { timestamp: last.timestamp, ..entry }
            }
            _ => entry,
        };
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CoordinationTraceEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
