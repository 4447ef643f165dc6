//! The expense ledger and its undo history.

mod core;
mod expense;
mod export;
mod undo;

pub use core::ExpenseLedger;
pub use expense::{Expense, ExpenseId, ExpensePatch};
pub use export::{CSV_HEADER, export_file_name, to_csv};
pub use undo::{UNDO_CAPACITY, UndoEntry, UndoKind, UndoLog};
