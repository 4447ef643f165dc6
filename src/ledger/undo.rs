//! The bounded log of inverse actions used to undo changes to the ledger.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::expense::{Expense, ExpensePatch};

/// The maximum number of undo entries kept in the log.
pub const UNDO_CAPACITY: usize = 10;

/// The kind of mutation an [UndoEntry] reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoKind {
    /// An expense was added, undoing removes it again.
    Add,
    /// An expense was updated, undoing restores the snapshot taken before the update.
    Update,
    /// An expense was deleted, undoing re-inserts it.
    Delete,
}

/// A record of a mutation that has been applied to the ledger, holding
/// everything needed to reverse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoEntry {
    /// The kind of mutation that was applied.
    pub kind: UndoKind,
    /// A snapshot of the expense.
    ///
    /// For [UndoKind::Update] this is the expense as it was *before* the
    /// update, for the other kinds it is the added or deleted expense.
    pub expense: Expense,
    /// The patch that was applied by an update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<ExpensePatch>,
    /// When the mutation was applied.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl UndoEntry {
    /// An entry that reverses adding `expense`.
    pub fn add(expense: Expense) -> Self {
        Self::new(UndoKind::Add, expense, None)
    }

    /// An entry that reverses an update, where `previous` is the expense
    /// before `patch` was applied.
    pub fn update(previous: Expense, patch: ExpensePatch) -> Self {
        Self::new(UndoKind::Update, previous, Some(patch))
    }

    /// An entry that reverses deleting `expense`.
    pub fn delete(expense: Expense) -> Self {
        Self::new(UndoKind::Delete, expense, None)
    }

    fn new(kind: UndoKind, expense: Expense, patch: Option<ExpensePatch>) -> Self {
        Self {
            kind,
            expense,
            patch,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// A last-in-first-out log of [UndoEntry] that holds at most [UNDO_CAPACITY] entries.
///
/// Pushing onto a full log silently evicts the oldest entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UndoLog {
    entries: VecDeque<UndoEntry>,
}

impl UndoLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`, evicting the oldest entries if the log is over capacity.
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push_back(entry);

        while self.entries.len() > UNDO_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Remove and return the most recently pushed entry.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    /// The most recently pushed entry.
    pub fn last(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    /// The number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }
}

impl FromIterator<UndoEntry> for UndoLog {
    fn from_iter<T: IntoIterator<Item = UndoEntry>>(iter: T) -> Self {
        let mut log = UndoLog::new();

        for entry in iter {
            log.push(entry);
        }

        log
    }
}
