//! The expense ledger: owns the expenses and the undo log and writes both
//! through to storage after every change.

use time::Date;

use crate::{
    Error,
    storage::{EXPENSES_KEY, KeyValueStore, UNDO_KEY, load_or_default, save},
};

use super::{
    export::to_csv,
    expense::{Expense, ExpenseId, ExpensePatch},
    undo::{UndoEntry, UndoKind, UndoLog},
};

/// An ordered list of expenses with a bounded undo history, persisted to a
/// [KeyValueStore].
///
/// Expenses are kept in insertion order. Every mutation records an entry in the
/// undo log and then writes both the expenses and the undo log to the store.
/// Failing to write to the store is logged but does not fail the mutation, the
/// in-memory state stays authoritative until the next successful write.
///
/// # Examples
///
/// ```
/// use pocketlog::{ExpenseLedger, MemoryKeyValueStore};
/// use time::macros::date;
///
/// let mut ledger = ExpenseLedger::load(MemoryKeyValueStore::new());
///
/// ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
/// assert_eq!(ledger.total(), 4.5);
///
/// ledger.undo();
/// assert!(ledger.is_empty());
/// ```
#[derive(Debug)]
pub struct ExpenseLedger<S> {
    store: S,
    expenses: Vec<Expense>,
    history: UndoLog,
    busy: bool,
}

impl<S: KeyValueStore> ExpenseLedger<S> {
    /// Load the ledger and its undo log from `store`.
    ///
    /// Missing keys give an empty ledger or undo log. Data that cannot be read
    /// or parsed is logged and also treated as empty, so loading never fails.
    pub fn load(store: S) -> Self {
        let expenses: Vec<Expense> = load_or_default(&store, EXPENSES_KEY);
        let history: UndoLog = load_or_default(&store, UNDO_KEY);

        tracing::debug!(
            "Loaded {} expense(s) and {} undo entries",
            expenses.len(),
            history.len()
        );

        Self {
            store,
            expenses,
            history,
            busy: false,
        }
    }

    /// The expenses in display order.
    pub fn records(&self) -> &[Expense] {
        &self.expenses
    }

    /// Get the expense with `id`.
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// The number of expenses.
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether there are no expenses.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// The sum of all expense amounts.
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// The undo log, oldest entry first.
    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    /// Whether a mutation is in progress.
    ///
    /// This is advisory only, intended for showing a busy indicator.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The store the ledger persists to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a new expense to the end of the ledger.
    ///
    /// The description is trimmed and may be empty. Returns the created expense
    /// with its generated ID.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is infinite or NaN, since it
    /// could not be written to the store and read back.
    pub fn add(&mut self, description: &str, amount: f64, date: Date) -> Result<Expense, Error> {
        check_amount(amount)?;
        self.busy = true;

        let expense = Expense::new(description, amount, date);
        tracing::debug!("Adding expense {}", expense.id);

        self.expenses.push(expense.clone());
        self.history.push(UndoEntry::add(expense.clone()));
        self.persist();

        Ok(expense)
    }

    /// Apply `patch` to the expense with `id`.
    ///
    /// The expense as it was before the update is recorded in the undo log, so
    /// undoing restores the full record. Does nothing if no expense has `id` or
    /// the patch is empty.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the patch sets an infinite or NaN amount.
    pub fn update(&mut self, id: ExpenseId, patch: ExpensePatch) -> Result<(), Error> {
        if let Some(amount) = patch.amount {
            check_amount(amount)?;
        }

        if patch.is_empty() {
            tracing::debug!("Ignoring empty update for expense {id}");
            return Ok(());
        }

        let Some(expense) = self.expenses.iter_mut().find(|expense| expense.id == id) else {
            tracing::debug!("Ignoring update for missing expense {id}");
            return Ok(());
        };

        self.busy = true;
        tracing::debug!("Updating expense {id}");

        self.history.push(UndoEntry::update(expense.clone(), patch.clone()));
        expense.apply(&patch);
        self.persist();

        Ok(())
    }

    /// Remove the expense with `id`.
    ///
    /// Does nothing if no expense has `id`.
    pub fn delete(&mut self, id: ExpenseId) {
        let Some(index) = self.position(id) else {
            tracing::debug!("Ignoring delete for missing expense {id}");
            return;
        };

        self.busy = true;
        tracing::debug!("Deleting expense {id}");

        let expense = self.expenses.remove(index);
        self.history.push(UndoEntry::delete(expense));
        self.persist();
    }

    /// Reverse the most recent change recorded in the undo log.
    ///
    /// - An added expense is removed again.
    /// - A deleted expense is appended to the end of the ledger, its previous
    ///   position is not restored.
    /// - An updated expense is replaced by the snapshot taken before the update.
    ///
    /// Undoing is not itself recorded, there is no redo. Does nothing if the
    /// undo log is empty.
    pub fn undo(&mut self) {
        let Some(entry) = self.history.pop() else {
            tracing::debug!("Nothing to undo");
            return;
        };

        self.busy = true;
        let id = entry.expense.id;
        tracing::debug!("Undoing {:?} of expense {id}", entry.kind);

        match entry.kind {
            UndoKind::Add => {
                self.expenses.retain(|expense| expense.id != id);
            }
            UndoKind::Delete => {
                if self.position(id).is_none() {
                    self.expenses.push(entry.expense);
                }
            }
            UndoKind::Update => {
                if let Some(index) = self.position(id) {
                    self.expenses[index] = entry.expense;
                }
            }
        }

        self.persist();
    }

    /// Remove every expense.
    ///
    /// Each removed expense gets its own delete entry in the undo log, so only
    /// the last [UNDO_CAPACITY](super::UNDO_CAPACITY) deletions can be undone,
    /// one at a time.
    pub fn clear_all(&mut self) {
        if self.expenses.is_empty() {
            return;
        }

        self.busy = true;
        tracing::debug!("Clearing {} expense(s)", self.expenses.len());

        for expense in self.expenses.drain(..) {
            self.history.push(UndoEntry::delete(expense));
        }

        self.persist();
    }

    /// The ledger as CSV text, or `None` if there are no expenses.
    ///
    /// See [to_csv](super::to_csv) for the format.
    pub fn export_snapshot(&self) -> Option<String> {
        to_csv(&self.expenses)
    }

    fn position(&self, id: ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|expense| expense.id == id)
    }

    /// Write the expenses and undo log to the store and clear the busy flag.
    fn persist(&mut self) {
        if let Err(error) = save(&self.store, EXPENSES_KEY, &self.expenses) {
            tracing::error!("Could not save expenses: {error}");
        }

        if let Err(error) = save(&self.store, UNDO_KEY, &self.history) {
            tracing::error!("Could not save undo log: {error}");
        }

        self.busy = false;
    }
}

/// Amounts are stored as JSON numbers, which cannot hold infinity or NaN.
fn check_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        ledger::{ExpensePatch, UNDO_CAPACITY, UndoKind},
        storage::{
            EXPENSES_KEY, KeyValueStore, MemoryKeyValueStore, SQLiteKeyValueStore, UNDO_KEY,
        },
    };

    use super::ExpenseLedger;

    fn get_test_ledger() -> ExpenseLedger<MemoryKeyValueStore> {
        ExpenseLedger::load(MemoryKeyValueStore::new())
    }

    /// A store that can be read but refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }
    }

    #[test]
    fn add_appends_expense_and_records_undo() {
        let mut ledger = get_test_ledger();

        let first = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let second = ledger.add("  Lunch ", 12.0, date!(2024 - 01 - 04)).unwrap();

        assert_eq!(ledger.records(), [first.clone(), second.clone()]);
        assert_eq!(second.description, "Lunch");
        assert_eq!(ledger.history().len(), 2);
        assert_eq!(ledger.history().last().map(|entry| entry.kind), Some(UndoKind::Add));
        assert!(ledger.can_undo());
        assert!(!ledger.is_busy());
    }

    #[test]
    fn add_accepts_blank_expense() {
        let mut ledger = get_test_ledger();

        let expense = ledger.add("", 0.0, date!(2024 - 01 - 05)).unwrap();

        assert_eq!(ledger.get(expense.id), Some(&expense));
    }

    #[test]
    fn added_expenses_have_unique_ids() {
        let mut ledger = get_test_ledger();

        for i in 0..50 {
            ledger.add(&format!("Item {i}"), i as f64, date!(2024 - 01 - 05)).unwrap();
        }

        let ids: HashSet<_> = ledger.records().iter().map(|expense| expense.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn undo_add_restores_previous_ledger() {
        let mut ledger = get_test_ledger();
        ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();
        let before = ledger.records().to_vec();

        ledger.add("Dinner", 30.0, date!(2024 - 01 - 05)).unwrap();
        ledger.undo();

        assert_eq!(ledger.records(), before);
    }

    #[test]
    fn update_merges_patch_in_place() {
        let mut ledger = get_test_ledger();
        let first = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let second = ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();

        ledger.update(first.id, ExpensePatch::default().amount(5.0)).unwrap();

        assert_eq!(ledger.records()[0].id, first.id);
        assert_eq!(ledger.records()[0].amount, 5.0);
        assert_eq!(ledger.records()[0].description, "Coffee");
        assert_eq!(ledger.records()[1], second);
    }

    #[test]
    fn update_records_snapshot_before_patch() {
        let mut ledger = get_test_ledger();
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let patch = ExpensePatch::default().description("Tea");

        ledger.update(expense.id, patch.clone()).unwrap();

        let entry = ledger.history().last().unwrap();
        assert_eq!(entry.kind, UndoKind::Update);
        assert_eq!(entry.expense, expense);
        assert_eq!(entry.patch, Some(patch));
    }

    #[test]
    fn undo_update_restores_all_fields() {
        let mut ledger = get_test_ledger();
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();

        ledger.update(
            expense.id,
            ExpensePatch::default()
                .description("Tea")
                .amount(3.0)
                .date(date!(2024 - 02 - 01)),
            )
            .unwrap();
        ledger.undo();

        assert_eq!(ledger.records()[0], expense);
    }

    #[test]
    fn update_missing_expense_is_noop() {
        let mut ledger = get_test_ledger();
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.delete(expense.id);
        let history_len = ledger.history().len();

        ledger.update(expense.id, ExpensePatch::default().amount(1.0)).unwrap();

        assert!(ledger.is_empty());
        assert_eq!(ledger.history().len(), history_len);
    }

    #[test]
    fn delete_removes_expense() {
        let mut ledger = get_test_ledger();
        let first = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let second = ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();

        ledger.delete(first.id);

        assert_eq!(ledger.records(), [second]);
        assert_eq!(
            ledger.history().last().map(|entry| (entry.kind, &entry.expense)),
            Some((UndoKind::Delete, &first))
        );
    }

    #[test]
    fn delete_missing_expense_is_noop() {
        let mut ledger = get_test_ledger();
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.undo();

        ledger.delete(expense.id);

        assert!(ledger.is_empty());
        assert!(!ledger.can_undo());
    }

    #[test]
    fn undo_delete_appends_expense() {
        let mut ledger = get_test_ledger();
        let first = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let second = ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();
        let third = ledger.add("Dinner", 30.0, date!(2024 - 01 - 05)).unwrap();

        ledger.delete(first.id);
        ledger.undo();

        assert_eq!(ledger.records(), [second, third, first]);
    }

    #[test]
    fn undo_with_empty_history_is_noop() {
        let mut ledger = get_test_ledger();

        ledger.undo();

        assert!(ledger.is_empty());
        assert!(!ledger.can_undo());
        assert_eq!(ledger.store().get(EXPENSES_KEY), Ok(None));
    }

    #[test]
    fn undo_does_not_record_itself() {
        let mut ledger = get_test_ledger();
        ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();

        ledger.undo();

        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn undo_add_after_delete_leaves_ledger_unchanged() {
        let mut ledger = get_test_ledger();
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.delete(expense.id);
        // Drop the delete entry by hand so the add entry is next.
        ledger.history.pop();

        ledger.undo();

        assert!(ledger.is_empty());
        assert!(!ledger.can_undo());
    }

    #[test]
    fn history_is_bounded() {
        let mut ledger = get_test_ledger();
        let first = ledger.add("first", 1.0, date!(2024 - 01 - 05)).unwrap();

        for i in 0..UNDO_CAPACITY {
            ledger.add(&i.to_string(), 1.0, date!(2024 - 01 - 05)).unwrap();
        }

        assert_eq!(ledger.history().len(), UNDO_CAPACITY);

        for _ in 0..UNDO_CAPACITY + 5 {
            ledger.undo();
        }

        assert_eq!(ledger.records(), [first]);
        assert!(!ledger.can_undo());
    }

    #[test]
    fn clear_all_records_delete_per_expense() {
        let mut ledger = get_test_ledger();
        ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();

        ledger.clear_all();

        assert!(ledger.is_empty());
        assert_eq!(ledger.history().len(), 4);
        assert!(
            ledger
                .history()
                .iter()
                .skip(2)
                .all(|entry| entry.kind == UndoKind::Delete)
        );
    }

    #[test]
    fn clear_all_on_empty_ledger_is_noop() {
        let mut ledger = get_test_ledger();

        ledger.clear_all();

        assert!(!ledger.can_undo());
    }

    #[test]
    fn clear_all_only_keeps_last_deletions_undoable() {
        let mut ledger = get_test_ledger();
        let expenses: Vec<_> = (0..15)
            .map(|i| {
                ledger
                    .add(&format!("Item {i}"), i as f64, date!(2024 - 01 - 05))
                    .unwrap()
            })
            .collect();

        ledger.clear_all();

        for _ in 0..UNDO_CAPACITY {
            ledger.undo();
        }

        assert!(!ledger.can_undo());
        let mut restored = ledger.records().to_vec();
        restored.reverse();
        assert_eq!(restored, expenses[5..]);
    }

    #[test]
    fn total_tracks_every_mutation() {
        let mut ledger = get_test_ledger();
        assert_eq!(ledger.total(), 0.0);

        let coffee = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let lunch = ledger.add("Lunch", 12.25, date!(2024 - 01 - 05)).unwrap();
        assert_eq!(ledger.total(), 16.75);

        ledger.update(coffee.id, ExpensePatch::default().amount(5.0)).unwrap();
        assert_eq!(ledger.total(), 17.25);

        ledger.delete(lunch.id);
        assert_eq!(ledger.total(), 5.0);

        ledger.undo();
        assert_eq!(ledger.total(), 17.25);

        ledger.undo();
        assert_eq!(ledger.total(), 16.75);

        ledger.clear_all();
        assert_eq!(ledger.total(), 0.0);
    }

    #[test]
    fn mutations_write_through_to_store() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);

        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();

        let saved_expenses = store.get(EXPENSES_KEY).unwrap().unwrap();
        let saved_history = store.get(UNDO_KEY).unwrap().unwrap();
        assert!(saved_expenses.contains(&expense.id.to_string()));
        assert!(saved_history.contains("\"add\""));

        ledger.undo();

        assert_eq!(store.get(EXPENSES_KEY), Ok(Some("[]".to_owned())));
        assert_eq!(store.get(UNDO_KEY), Ok(Some("[]".to_owned())));
    }

    #[test]
    fn reload_reproduces_ledger_and_history() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);
        let coffee = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let lunch = ledger.add("Lunch", 12.0, date!(2024 - 01 - 06)).unwrap();
        ledger.add("Dinner", 30.0, date!(2024 - 01 - 07)).unwrap();
        ledger.update(coffee.id, ExpensePatch::default().description("Tea")).unwrap();
        ledger.delete(lunch.id);

        let reloaded = ExpenseLedger::load(&store);

        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.history(), ledger.history());
    }

    #[test]
    fn reload_from_sqlite_reproduces_ledger_and_history() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let store = SQLiteKeyValueStore::new(Arc::new(Mutex::new(connection)));
        let mut ledger = ExpenseLedger::load(store.clone());
        let coffee = ledger.add("Coffee \"Large\"", 4.5, date!(2024 - 01 - 05)).unwrap();
        ledger.add("Lunch", 12.0, date!(2024 - 01 - 06)).unwrap();
        ledger.update(coffee.id, ExpensePatch::default().date(date!(2024 - 01 - 04))).unwrap();

        let reloaded = ExpenseLedger::load(store);

        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.history(), ledger.history());
        assert_eq!(reloaded.total(), 16.5);
    }

    #[test]
    fn corrupt_data_loads_as_empty() {
        let store = MemoryKeyValueStore::new();
        store.set(EXPENSES_KEY, "not json").unwrap();
        store.set(UNDO_KEY, "{\"broken\": ").unwrap();

        let ledger = ExpenseLedger::load(&store);

        assert!(ledger.is_empty());
        assert!(!ledger.can_undo());
    }

    #[test]
    fn corrupt_history_does_not_discard_expenses() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        store.set(UNDO_KEY, "[{]").unwrap();

        let reloaded = ExpenseLedger::load(&store);

        assert_eq!(reloaded.records(), [expense]);
        assert!(!reloaded.can_undo());
    }

    #[test]
    fn failed_writes_keep_in_memory_state() {
        let mut ledger = ExpenseLedger::load(ReadOnlyStore);

        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();

        assert_eq!(ledger.records(), [expense]);
        assert!(ledger.can_undo());
        assert!(!ledger.is_busy());
    }

    #[test]
    fn add_rejects_non_finite_amount() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);
        ledger.add("Rent", 1200.0, date!(2024 - 01 - 01)).unwrap();
        ledger.add("Coffee", 4.5, date!(2024 - 01 - 02)).unwrap();

        let result = ledger.add("Oops", f64::INFINITY, date!(2024 - 01 - 03));

        assert_eq!(result, Err(Error::InvalidAmount(f64::INFINITY)));
        assert!(matches!(
            ledger.add("Oops", f64::NAN, date!(2024 - 01 - 03)),
            Err(Error::InvalidAmount(_))
        ));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.history().len(), 2);

        let reloaded = ExpenseLedger::load(&store);
        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.history(), ledger.history());
    }

    #[test]
    fn update_rejects_non_finite_amount() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();

        let result = ledger.update(expense.id, ExpensePatch::default().amount(f64::NEG_INFINITY));

        assert_eq!(result, Err(Error::InvalidAmount(f64::NEG_INFINITY)));
        assert_eq!(ledger.records(), [expense.clone()]);
        assert_eq!(ExpenseLedger::load(&store).records(), [expense]);
    }

    #[test]
    fn update_with_empty_patch_is_noop() {
        let store = MemoryKeyValueStore::new();
        let mut ledger = ExpenseLedger::load(&store);
        let expense = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let saved_history = store.get(UNDO_KEY).unwrap();

        ledger.update(expense.id, ExpensePatch::default()).unwrap();

        assert_eq!(ledger.records(), [expense]);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(store.get(UNDO_KEY).unwrap(), saved_history);
    }

    #[test]
    fn undo_update_of_missing_expense_consumes_entry() {
        let mut ledger = get_test_ledger();
        let coffee = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let lunch = ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();
        ledger
            .update(coffee.id, ExpensePatch::default().description("Tea"))
            .unwrap();
        // Remove the expense without recording it so the update entry is next.
        ledger.expenses.retain(|expense| expense.id != coffee.id);
        let history_len = ledger.history().len();

        ledger.undo();

        assert_eq!(ledger.records(), [lunch]);
        assert_eq!(ledger.history().len(), history_len - 1);
        assert_eq!(
            ledger.history().last().map(|entry| entry.kind),
            Some(UndoKind::Add)
        );
    }

    #[test]
    fn undo_delete_does_not_duplicate_existing_id() {
        let mut ledger = get_test_ledger();
        let coffee = ledger.add("Coffee", 4.5, date!(2024 - 01 - 05)).unwrap();
        let lunch = ledger.add("Lunch", 12.0, date!(2024 - 01 - 05)).unwrap();
        ledger.delete(coffee.id);
        // Put the expense back without recording it so the delete entry is next.
        ledger.expenses.insert(0, coffee.clone());

        ledger.undo();

        assert_eq!(ledger.records(), [coffee, lunch]);
        assert_eq!(ledger.history().len(), 2);
    }

    #[test]
    fn export_snapshot_uses_ledger_order() {
        let mut ledger = get_test_ledger();
        assert_eq!(ledger.export_snapshot(), None);

        ledger.add("Coffee \"Large\"", 4.5, date!(2024 - 01 - 05)).unwrap();

        assert_eq!(
            ledger.export_snapshot().as_deref(),
            Some("Date,Description,Amount\n2024-01-05,\"Coffee \"\"Large\"\"\",4.50")
        );
    }
}
