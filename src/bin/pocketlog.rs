use std::{
    error::Error,
    fs::{self, OpenOptions},
    path::PathBuf,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use pocketlog::{
    CellOutcome, ExpenseLedger, Feedback, Field, KeyValueStore, SQLiteKeyValueStore, Settings,
    SettingsPatch, add_row, export_file_name, format_currency, initialize_db, save_cell,
    system_prefers_dark,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A spreadsheet-style expense log.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "POCKETLOG_DB_PATH", default_value = "pocketlog.db")]
    db_path: PathBuf,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all expenses and the total.
    List,
    /// Add an expense to the end of the list.
    Add {
        /// What the money was spent on.
        description: String,
        /// How much was spent, greater than zero.
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// When the money was spent (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Change one cell of an expense.
    ///
    /// Clearing both the description and the amount deletes the expense.
    Edit {
        /// The row number shown by `list`.
        row: usize,
        /// The column to change.
        field: FieldArg,
        /// The new value.
        value: String,
    },
    /// Delete an expense.
    Delete {
        /// The row number shown by `list`.
        row: usize,
    },
    /// Undo the last change.
    Undo,
    /// Delete all expenses.
    Clear,
    /// Export the expenses as CSV.
    Export {
        /// Where to write the CSV file, defaults to `pocketlog-expenses-<today>.csv`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show or change the colour theme.
    Theme {
        /// The theme to switch to.
        mode: Option<ThemeArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FieldArg {
    Description,
    Amount,
    Date,
}

impl From<FieldArg> for Field {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Description => Field::Description,
            FieldArg::Amount => Field::Amount,
            FieldArg::Date => Field::Date,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.log_file.as_ref())?;

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    let store = SQLiteKeyValueStore::new(Arc::new(Mutex::new(connection)));

    let mut ledger = ExpenseLedger::load(store);

    run_command(&mut ledger, args.command)
}

fn run_command<S: KeyValueStore>(
    ledger: &mut ExpenseLedger<S>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => print_expenses(ledger),
        Command::Add {
            description,
            amount,
            date,
        } => {
            let date = date.unwrap_or_else(today);

            match add_row(ledger, &description, &amount, date) {
                Ok(Some(_)) => confirm(Feedback::Added),
                Ok(None) => {
                    print_error("an expense needs a description and an amount greater than zero");
                    exit(1);
                }
                Err(error) => {
                    print_error(error);
                    exit(1);
                }
            }
        }
        Command::Edit { row, field, value } => {
            let index = row_index(row, ledger.len());

            match save_cell(ledger, index, field.into(), &value) {
                Ok(CellOutcome::Updated) => confirm(Feedback::Updated),
                Ok(CellOutcome::Deleted) => confirm(Feedback::Deleted),
                Err(error) => {
                    print_error(error);
                    exit(1);
                }
            }
        }
        Command::Delete { row } => {
            let index = row_index(row, ledger.len());
            let id = ledger.records()[index].id;
            ledger.delete(id);
            confirm(Feedback::Deleted);
        }
        Command::Undo => {
            if !ledger.can_undo() {
                println!("Nothing to undo");
                return Ok(());
            }

            ledger.undo();
            confirm(Feedback::Undone);
        }
        Command::Clear => {
            ledger.clear_all();
            println!("All expenses cleared");
        }
        Command::Export { output } => {
            let Some(csv) = ledger.export_snapshot() else {
                println!("No expenses to export");
                return Ok(());
            };

            let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(today())));
            fs::write(&path, csv)?;
            println!("CSV exported to {}", path.display());
        }
        Command::Theme { mode } => run_theme(ledger.store(), mode),
    }

    Ok(())
}

fn run_theme<S: KeyValueStore>(store: S, mode: Option<ThemeArg>) {
    let mut settings = Settings::load(store, system_prefers_dark());

    let theme = match mode {
        None => settings.get().theme(),
        Some(ThemeArg::Toggle) => settings.toggle_dark_mode(),
        Some(mode) => {
            settings.update(SettingsPatch {
                dark_mode: Some(matches!(mode, ThemeArg::Dark)),
            });
            settings.get().theme()
        }
    };

    println!("Theme: {theme}");
}

fn print_expenses<S: KeyValueStore>(ledger: &ExpenseLedger<S>) {
    if ledger.is_empty() {
        println!("No expenses yet. Add one with `pocketlog add <DESCRIPTION> <AMOUNT>`.");
        return;
    }

    println!("{:>3}  {:<30}  {:>12}  {:<10}", "#", "DESCRIPTION", "AMOUNT", "DATE");

    for (index, expense) in ledger.records().iter().enumerate() {
        println!(
            "{:>3}  {:<30}  {:>12}  {}",
            index + 1,
            expense.description,
            format_currency(expense.amount),
            expense.date
        );
    }

    let count = ledger.len();
    println!();
    println!(
        "Total Expenses ({count} item{}) {}",
        if count == 1 { "" } else { "s" },
        format_currency(ledger.total())
    );
}

/// Convert a row number as shown by `list` into an index, exiting if there is no such row.
fn row_index(row: usize, row_count: usize) -> usize {
    if row == 0 || row > row_count {
        print_error(format!("There is no expense in row {row}."));
        exit(1);
    }

    row - 1
}

fn confirm(feedback: Feedback) {
    tracing::debug!("Feedback pattern {:?}", feedback.pattern());
    println!("{feedback}");
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, DATE_FORMAT).map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

fn setup_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
