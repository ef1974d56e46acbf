//! # Undo/Redo History
//!
//! A linear, snapshot-based history over immutable configuration values.
//!
//! ```text
//!  write(c)         [a, b, c]          cursor → c
//!  undo()           [a, b, c]          cursor → b
//!  write(d)         [a, b, d]          c is discarded (no redo branches)
//!  write(d) again   [a, b, d]          value-equal write, no-op
//! ```
//!
//! Snapshots are compared by their canonical serialized form (`serde_json`
//! values keep object keys sorted), so two values are equal exactly when they
//! serialize identically. Nothing here can fail: undo/redo at the ends are
//! no-ops. Length is unbounded; hosts that want a cap enforce it themselves.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Canonical serialized form used for equality. `None` if `value` cannot be
/// represented as JSON.
pub fn canonical<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Linear undo/redo stack of full snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct History<T> {
    initial: T,
    entries: Vec<T>,
    cursor: usize,
}

impl<T: Serialize + Clone> History<T> {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial.clone()],
            initial,
            cursor: 0,
        }
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record a new snapshot.
    ///
    /// Value-equal writes are ignored. Otherwise everything after the cursor
    /// is dropped, `value` is appended and becomes current. Returns whether
    /// the history changed.
    pub fn write(&mut self, value: T) -> bool {
        let same = match (canonical(self.current()), canonical(&value)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        if same {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(value);
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Apply `f` to a copy of the current snapshot and write the result.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.current().clone();
        f(&mut next);
        self.write(next)
    }

    /// Step back one snapshot. Returns whether the cursor moved.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot. Returns whether the cursor moved.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Write the initial snapshot again, with write semantics.
    pub fn reset(&mut self) -> bool {
        self.write(self.initial.clone())
    }

    /// Write the initial snapshot merged with `overrides`.
    ///
    /// `overrides` is a JSON object whose keys replace those of the initial
    /// snapshot (nested objects merge recursively). If the merged value does
    /// not deserialize, the plain initial snapshot is written instead.
    pub fn reset_with(&mut self, overrides: &Value) -> bool
    where
        T: DeserializeOwned,
    {
        let merged = canonical(&self.initial).and_then(|mut base| {
            merge(&mut base, overrides);
            serde_json::from_value::<T>(base)
                .map_err(|e| log::warn!("ignoring history reset override: {}", e))
                .ok()
        });
        match merged {
            Some(value) => self.write(value),
            None => self.reset(),
        }
    }

    /// Iterate all snapshots, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

/// Recursively merge `patch` into `base`. Non-object patches replace.
fn merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(b), Value::Object(p)) => {
            for (k, v) in p {
                merge(b.entry(k.clone()).or_insert(Value::Null), v);
            }
        }
        (b, p) => *b = p.clone(),
    }
}
