// Bounded, newest-first log of past computations.
// Oldest records are evicted silently once the log is full.

use serde::Serialize;

use crate::types::{HistoryId, HistoryRecord};

/// Maximum number of records kept.
pub const HISTORY_LIMIT: usize = 10;

/// Newest-first list of at most [`HISTORY_LIMIT`] records.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        History {
            records: Vec::with_capacity(HISTORY_LIMIT),
        }
    }

    /// Insert `record` at the front, dropping whatever falls past the limit.
    pub fn push_front(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }
}

/// Hands out session-unique record ids (`calc-1`, `calc-2`, ... in base 36).
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator { next: 1 }
    }

    pub fn next_id(&mut self) -> HistoryId {
        let n = self.next.max(1);
        self.next = n + 1;
        HistoryId::new(format!("calc-{}", to_base36(n)))
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
