//! Cell editing rules for the spreadsheet-style expense grid.
//!
//! The grid shows one row per expense followed by a row for entering a new
//! expense. Editing a cell either updates the expense or, when the edit leaves
//! the row with no description and a zero amount, deletes it.

use std::fmt::Display;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    ledger::{Expense, ExpenseLedger, ExpensePatch},
    storage::KeyValueStore,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A column in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// What the money was spent on.
    Description,
    /// How much was spent.
    Amount,
    /// When the money was spent.
    Date,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Date => "date",
        };

        write!(f, "{name}")
    }
}

/// A position in the grid.
///
/// A `row` equal to the number of expenses refers to the new expense row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The zero-based row index.
    pub row: usize,
    /// The column.
    pub field: Field,
}

impl Cell {
    /// Create a cell position.
    pub fn new(row: usize, field: Field) -> Self {
        Self { row, field }
    }
}

/// A parsed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A description.
    Description(String),
    /// An amount.
    Amount(f64),
    /// A date.
    Date(Date),
}

impl CellValue {
    /// Parse the text typed into a cell of `field`.
    ///
    /// A blank amount is read as zero.
    ///
    /// # Errors
    /// Returns [Error::InvalidCellValue] if an amount is not a number or a date
    /// is not in the format `YYYY-MM-DD`.
    pub fn parse(field: Field, raw: &str) -> Result<Self, Error> {
        match field {
            Field::Description => Ok(CellValue::Description(raw.to_owned())),
            Field::Amount => parse_amount(raw).map(CellValue::Amount),
            Field::Date => Date::parse(raw.trim(), DATE_FORMAT)
                .map(CellValue::Date)
                .map_err(|_| Error::InvalidCellValue {
                    field,
                    value: raw.to_owned(),
                }),
        }
    }

    fn into_patch(self) -> ExpensePatch {
        let patch = ExpensePatch::default();

        match self {
            CellValue::Description(description) => patch.description(&description),
            CellValue::Amount(amount) => patch.amount(amount),
            CellValue::Date(date) => patch.date(date),
        }
    }
}

/// Parse an amount, reading a blank amount as zero.
fn parse_amount(raw: &str) -> Result<f64, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(0.0);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::InvalidCellValue {
            field: Field::Amount,
            value: raw.to_owned(),
        })
}

/// What saving a cell did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// The expense was updated with the new value.
    Updated,
    /// The edit left the expense without a description or amount, so it was deleted.
    Deleted,
}

/// Save the text typed into the cell at `row`, `field`.
///
/// If the expense would be left with a blank description and a zero amount it
/// is deleted instead of updated.
///
/// # Errors
/// This function will return a:
/// - [Error::RowOutOfRange] if `row` does not refer to an expense,
/// - or [Error::InvalidCellValue] if `raw` cannot be parsed for `field`.
pub fn save_cell<S: KeyValueStore>(
    ledger: &mut ExpenseLedger<S>,
    row: usize,
    field: Field,
    raw: &str,
) -> Result<CellOutcome, Error> {
    let expense = ledger
        .records()
        .get(row)
        .ok_or(Error::RowOutOfRange(row))?;
    let id = expense.id;
    let value = CellValue::parse(field, raw)?;

    let description = match &value {
        CellValue::Description(description) => description.as_str(),
        _ => expense.description.as_str(),
    };
    let amount = match value {
        CellValue::Amount(amount) => amount,
        _ => expense.amount,
    };

    if description.trim().is_empty() && amount == 0.0 {
        ledger.delete(id);
        Ok(CellOutcome::Deleted)
    } else {
        ledger.update(id, value.into_patch())?;
        Ok(CellOutcome::Updated)
    }
}

/// Add the expense typed into the new expense row.
///
/// The row is only turned into an expense once it has a description and an
/// amount greater than zero, otherwise `Ok(None)` is returned and the ledger is
/// left unchanged. A blank amount is read as zero.
///
/// # Errors
/// Returns [Error::InvalidCellValue] if `raw_amount` is not a finite number.
pub fn add_row<S: KeyValueStore>(
    ledger: &mut ExpenseLedger<S>,
    description: &str,
    raw_amount: &str,
    date: Date,
) -> Result<Option<Expense>, Error> {
    let amount = parse_amount(raw_amount)?;

    if description.trim().is_empty() || amount <= 0.0 {
        tracing::debug!("Ignoring incomplete new expense row");
        return Ok(None);
    }

    ledger.add(description, amount, date).map(Some)
}

/// The cell to edit after `current` when the user moves on.
///
/// Moves across a row from description to amount to date, then to the
/// description of the next row. After the last expense the new expense row is
/// next, which has the index `row_count`.
pub fn next_cell(current: Cell, row_count: usize) -> Cell {
    match current.field {
        Field::Description => Cell::new(current.row, Field::Amount),
        Field::Amount => Cell::new(current.row, Field::Date),
        Field::Date if current.row + 1 < row_count => Cell::new(current.row + 1, Field::Description),
        Field::Date => Cell::new(row_count, Field::Description),
    }
}
