//! The expense store: the single owner of the expense collection.
//!
//! Every mutating operation serializes the whole collection to durable storage before it returns.
//! The new collection is built on the side and only replaces the in-memory one after the write
//! succeeds, so memory and storage are equal whenever an operation returns.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Expense, ExpenseId, ExpenseInput};
use crate::storage::KeyValueStore;
use crate::Result;
use anyhow::Context;
use chrono::Utc;
use tracing::{debug, warn};

/// The storage key that holds the serialized collection.
pub const EXPENSES_KEY: &str = "expenses";

/// Owns the authoritative list of expenses and mirrors it to a `KeyValueStore`.
#[derive(Debug)]
pub struct ExpenseStore<K: KeyValueStore> {
    storage: K,
    expenses: Vec<Expense>,
}

impl<K: KeyValueStore> ExpenseStore<K> {
    /// Reads the persisted collection from `storage`.
    ///
    /// A missing, unreadable or unparseable value produces an empty store; this never fails.
    pub async fn load(storage: K) -> Self {
        let expenses = match storage.get(EXPENSES_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Expense>>(&json) {
                Ok(expenses) => expenses,
                Err(e) => {
                    warn!("The stored expenses could not be parsed, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("The stored expenses could not be read, starting empty: {e:#}");
                Vec::new()
            }
        };
        debug!("Loaded {} expenses", expenses.len());
        Self { storage, expenses }
    }

    /// All expenses, oldest first.
    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    /// The expense with `id`, if there is one.
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    /// Validates `input`, appends it as a new expense with a fresh id, and persists.
    pub async fn add(&mut self, input: &ExpenseInput) -> Result<Expense> {
        let fields = input.validate()?;
        let expense = Expense::new(self.next_id(), fields);
        let mut next = self.expenses.clone();
        next.push(expense.clone());
        self.commit(next).await?;
        debug!("Added expense {}", expense.id());
        Ok(expense)
    }

    /// Validates `input` and replaces the fields of expense `id` in place, then persists.
    ///
    /// Returns a `NotFound` error, and changes nothing, if there is no expense with `id`.
    pub async fn update(&mut self, id: ExpenseId, input: &ExpenseInput) -> Result<Expense> {
        let fields = input.validate()?;
        let index = self
            .expenses
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| Error::not_found(format!("Expense {id} not found")))?;
        let expense = Expense::new(id, fields);
        let mut next = self.expenses.clone();
        next[index] = expense.clone();
        self.commit(next).await?;
        debug!("Updated expense {id}");
        Ok(expense)
    }

    /// Removes expense `id` if it exists, then persists. Deleting a missing id is not an error.
    pub async fn delete(&mut self, id: ExpenseId) -> Result<Option<Expense>> {
        let mut next = self.expenses.clone();
        let removed = next
            .iter()
            .position(|e| e.id() == id)
            .map(|index| next.remove(index));
        self.commit(next).await?;
        match &removed {
            Some(_) => debug!("Deleted expense {id}"),
            None => debug!("Expense {id} was already absent"),
        }
        Ok(removed)
    }

    /// Ids come from the clock, bumped past the largest existing id when the clock has not moved.
    fn next_id(&self) -> ExpenseId {
        let now = Utc::now().timestamp_millis();
        let largest = self.expenses.iter().map(|e| e.id().value()).max();
        match largest {
            Some(largest) if largest >= now => ExpenseId::new(largest + 1),
            _ => ExpenseId::new(now),
        }
    }

    async fn commit(&mut self, next: Vec<Expense>) -> Result<()> {
        let json = serde_json::to_string(&next)
            .context("Unable to serialize expenses")
            .pub_result(ErrorType::Storage)?;
        self.storage
            .set(EXPENSES_KEY, &json)
            .await
            .context("Unable to save expenses")
            .pub_result(ErrorType::Storage)?;
        self.expenses = next;
        Ok(())
    }
}
