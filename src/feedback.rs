//! Tactile feedback for ledger operations.
//!
//! The ledger itself never emits feedback. Front ends that can vibrate or
//! otherwise signal the user pick the [Feedback] for the operation they just
//! ran and play its [pattern](Feedback::pattern).

use std::fmt::Display;

/// The kind of pulse to play after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// An expense was added.
    Added,
    /// An expense was updated.
    Updated,
    /// An expense was deleted.
    Deleted,
    /// An action was undone.
    Undone,
}

impl Feedback {
    /// The vibration pattern in milliseconds, alternating between on and off.
    pub fn pattern(&self) -> &'static [u32] {
        match self {
            Feedback::Added => &[50],
            Feedback::Updated => &[30],
            Feedback::Deleted => &[30, 50, 30],
            Feedback::Undone => &[100],
        }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Feedback::Added => "Expense added",
            Feedback::Updated => "Expense updated",
            Feedback::Deleted => "Expense deleted",
            Feedback::Undone => "Action undone",
        };

        write!(f, "{message}")
    }
}
