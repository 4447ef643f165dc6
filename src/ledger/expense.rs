//! Defines the expense record and the partial updates that can be applied to it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// An opaque, unique identifier for an [Expense].
///
/// IDs are random (v4) UUIDs generated when the expense is created and never
/// change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Generate a fresh, random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single line item in the ledger, i.e. some money that was spent on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    ///
    /// Amounts are expected to be non-negative and are only rounded to two
    /// decimal places when displayed or exported.
    pub amount: f64,
    /// The day the money was spent.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Expense {
    /// Create a new expense with a freshly generated ID.
    ///
    /// The description is trimmed, no other validation is done.
    pub fn new(description: &str, amount: f64, date: Date) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.trim().to_owned(),
            amount,
            date,
        }
    }

    /// Merge the fields set in `patch` into this expense.
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }

        if let Some(amount) = patch.amount {
            self.amount = amount;
        }

        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

/// A partial [Expense], where only the fields that are set are changed when the
/// patch is applied.
///
/// # Examples
///
/// ```
/// use pocketlog::ExpensePatch;
///
/// let patch = ExpensePatch::default().description("Lunch").amount(12.5);
///
/// assert_eq!(patch.description.as_deref(), Some("Lunch"));
/// assert_eq!(patch.amount, Some(12.5));
/// assert_eq!(patch.date, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    /// The new description, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The new amount, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// The new date, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date::option")]
    pub date: Option<Date>,
}

impl ExpensePatch {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the date.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether the patch would leave an expense unchanged.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }
}
