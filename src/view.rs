//! The filtered view of the store, and the per-row view state of the presentation layer.

use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Expense, ExpenseId, ExpenseInput, Filter};
use crate::storage::KeyValueStore;
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// Session storage key for the category selector.
pub const FILTER_CATEGORY_KEY: &str = "filterCategory";

/// Session storage key for the date selector.
pub const FILTER_DATE_KEY: &str = "filterDate";

/// Projects a list of expenses through the session's `Filter`.
///
/// Nothing is cached: every call derives its result from the records it is given and the current
/// filter.
#[derive(Debug)]
pub struct FilteredView<K: KeyValueStore> {
    session: K,
    filter: Filter,
}

impl<K: KeyValueStore> FilteredView<K> {
    /// Reads the filter selectors from session storage. Missing or unreadable selectors are unset.
    pub async fn load(session: K) -> Self {
        let category = read_selector(&session, FILTER_CATEGORY_KEY).await;
        let date = read_selector(&session, FILTER_DATE_KEY).await;
        let filter = Filter::new(category, date);
        debug!("Loaded filter {filter:?}");
        Self { session, filter }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Replaces both selectors and writes them to session storage. An absent or empty selector
    /// clears that constraint.
    pub async fn set_filter<S1, S2>(&mut self, category: Option<S1>, date: Option<S2>) -> Result<()>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let filter = Filter::new(category, date);
        for (key, value) in [
            (FILTER_CATEGORY_KEY, &filter.category),
            (FILTER_DATE_KEY, &filter.date),
        ] {
            self.session
                .set(key, value.as_deref().unwrap_or_default())
                .await
                .with_context(|| format!("Unable to save the {key} selector"))
                .pub_result(ErrorType::Storage)?;
        }
        debug!("Filter set to {filter:?}");
        self.filter = filter;
        Ok(())
    }

    /// The records that match the filter, in their original order.
    pub fn filtered_records<'a>(&self, records: &'a [Expense]) -> Vec<&'a Expense> {
        records.iter().filter(|e| self.filter.matches(e)).collect()
    }

    /// The sum of the amounts of the records that match the filter.
    pub fn total(&self, records: &[Expense]) -> Total {
        self.filtered_records(records)
            .into_iter()
            .map(|e| e.amount())
            .sum()
    }
}

async fn read_selector(session: &impl KeyValueStore, key: &str) -> Option<String> {
    match session.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Unable to read the {key} selector, leaving it unset: {e:#}");
            None
        }
    }
}

/// The sum of a set of amounts. Displays with exactly two decimals, e.g. `80.00`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Total(Decimal);

impl Total {
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Display for Total {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut value = self.0.round_dp(2);
        value.rescale(2);
        Display::fmt(&value, f)
    }
}

impl Serialize for Total {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Saturates at `Decimal::MAX` instead of overflowing. Validated amounts never get there, but
/// hand-edited storage can.
impl std::iter::Sum<Amount> for Total {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        Total(iter.fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.value())))
    }
}

/// Whether a row of the list is being shown or edited.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "draft")]
pub enum RowState {
    #[default]
    Viewing,
    /// The row is an edit form holding this draft.
    Editing(ExpenseInput),
}

/// The view state of each row. Rows that are not tracked are `Viewing`.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    editing: BTreeMap<ExpenseId, ExpenseInput>,
}

impl Rows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: ExpenseId) -> RowState {
        match self.editing.get(&id) {
            Some(draft) => RowState::Editing(draft.clone()),
            None => RowState::Viewing,
        }
    }

    /// Switches the row to an edit form pre-filled from `expense` and returns the draft. A row that
    /// is already being edited keeps its draft.
    pub fn begin_edit(&mut self, expense: &Expense) -> ExpenseInput {
        self.editing
            .entry(expense.id())
            .or_insert_with(|| expense.to_input())
            .clone()
    }

    /// Returns the row to `Viewing`, discarding its draft. Returns true if it was being edited.
    pub fn cancel_edit(&mut self, id: ExpenseId) -> bool {
        self.editing.remove(&id).is_some()
    }

    /// Called after a save or a delete of `id` succeeds.
    pub fn finish(&mut self, id: ExpenseId) {
        self.editing.remove(&id);
    }
}
