//! PocketLog is a spreadsheet-style expense log for a single user.
//!
//! This library provides the expense ledger with its undo history, the
//! key-value storage it persists to, the cell-editing rules of the expense
//! grid, and the app settings.

#![warn(missing_docs)]

mod currency;
mod db;
mod feedback;
mod grid;
mod ledger;
mod settings;
mod storage;

pub use currency::format_currency;
pub use db::initialize as initialize_db;
pub use feedback::Feedback;
pub use grid::{Cell, CellOutcome, CellValue, Field, add_row, next_cell, save_cell};
pub use ledger::{
    CSV_HEADER, Expense, ExpenseId, ExpenseLedger, ExpensePatch, UNDO_CAPACITY, UndoEntry,
    UndoKind, UndoLog, export_file_name, to_csv,
};
pub use settings::{AppSettings, Settings, SettingsPatch, Theme, system_prefers_dark};
pub use storage::{
    EXPENSES_KEY, KeyValueStore, MemoryKeyValueStore, SETTINGS_KEY, SQLiteKeyValueStore,
    UNDO_KEY,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The text typed into a grid cell could not be parsed for its column.
    #[error("invalid {field}: \"{value}\"")]
    InvalidCellValue {
        /// The column of the cell.
        field: Field,
        /// The text that could not be parsed.
        value: String,
    },

    /// An amount was infinite or NaN.
    #[error("{0} is not a valid amount")]
    InvalidAmount(f64),

    /// A grid row index did not refer to an expense.
    #[error("there is no expense in row {}", .0 + 1)]
    RowOutOfRange(usize),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
