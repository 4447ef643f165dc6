//! Formats the ledger as CSV text.

use time::Date;

use super::expense::Expense;

/// The header row of the exported CSV.
pub const CSV_HEADER: &str = "Date,Description,Amount";

/// Format `expenses` as CSV with the columns `Date,Description,Amount`.
///
/// Returns `None` if there are no expenses to export.
///
/// The description is always quoted with any quotes inside doubled, the amount
/// has exactly two decimal places with halves rounded away from zero, and the
/// date is written as `YYYY-MM-DD`.
/// Lines are joined with `\n` and there is no trailing newline.
pub fn to_csv(expenses: &[Expense]) -> Option<String> {
    if expenses.is_empty() {
        return None;
    }

    let lines = std::iter::once(CSV_HEADER.to_owned()).chain(expenses.iter().map(to_csv_row));

    Some(lines.collect::<Vec<_>>().join("\n"))
}

fn to_csv_row(expense: &Expense) -> String {
    format!(
        "{},\"{}\",{:.2}",
        expense.date,
        expense.description.replace('"', "\"\""),
        (expense.amount * 100.0).round() / 100.0
    )
}

/// The conventional file name for an export made on `today`,
/// e.g. `pocketlog-expenses-2024-01-05.csv`.
pub fn export_file_name(today: Date) -> String {
    format!("pocketlog-expenses-{today}.csv")
}
