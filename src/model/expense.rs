use crate::error::Error;
use crate::model::Amount;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The unique, immutable identifier of an expense. Derived from the creation time in
/// milliseconds since the Unix epoch.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct ExpenseId(i64);

impl ExpenseId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for ExpenseId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A single recorded expense.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub(crate) id: ExpenseId,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    /// ISO date, `YYYY-MM-DD`.
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) notes: String,
}

impl Expense {
    pub(crate) fn new(id: ExpenseId, fields: ValidFields) -> Self {
        Self {
            id,
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
            notes: fields.notes,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The record's fields as they would appear pre-filled in an edit form.
    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput {
            amount: self.amount.to_string(),
            category: self.category.clone(),
            date: self.date.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// The user-entered fields of an expense, as text, before validation.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseInput {
    /// The amount spent, in currency units. Must be a number greater than zero.
    pub amount: String,
    /// A free-form category label such as "Food". Must not be empty.
    pub category: String,
    /// The date of the expense, `YYYY-MM-DD`. Must not be empty.
    pub date: String,
    /// Optional free text.
    #[serde(default)]
    pub notes: String,
}

impl ExpenseInput {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
            notes: notes.into(),
        }
    }

    /// Checks that the amount is a positive number no larger than `Amount::max` and that category
    /// and date are present.
    ///
    /// The amount is reduced to the precision it is persisted with, so a record reads back from
    /// storage exactly as it was added.
    pub(crate) fn validate(&self) -> Result<ValidFields, Error> {
        let amount = match Amount::from_str(&self.amount) {
            Ok(amount) => amount,
            Err(e) if e.is_empty() => {
                return Err(Error::validation("Amount, category, and date are required"))
            }
            Err(e) => {
                return Err(Error::validation(format!(
                    "Amount '{}' is not a number: {e}",
                    self.amount
                )))
            }
        };
        if !amount.is_positive() {
            return Err(Error::validation(format!(
                "Amount must be greater than zero, got {amount}"
            )));
        }
        if amount > Amount::max() {
            return Err(Error::validation(format!(
                "Amount must be at most {}, got {amount}",
                Amount::max()
            )));
        }
        let amount = match amount.stored() {
            Some(stored) if stored.is_positive() => stored,
            _ => {
                return Err(Error::validation(format!(
                    "Amount {amount} is too small to record"
                )))
            }
        };
        if self.category.is_empty() || self.date.is_empty() {
            return Err(Error::validation("Amount, category, and date are required"));
        }
        Ok(ValidFields {
            amount,
            category: self.category.clone(),
            date: self.date.clone(),
            notes: self.notes.clone(),
        })
    }
}

/// Fields that have passed validation and can become an `Expense`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct ValidFields {
    amount: Amount,
    category: String,
    date: String,
    notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;

    fn validate(amount: &str, category: &str, date: &str) -> Result<ValidFields, Error> {
        ExpenseInput::new(amount, category, date, "").validate()
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        let fields = validate("50", "Food", "2024-01-01").unwrap();
        let expense = Expense::new(ExpenseId::new(1), fields);
        assert_eq!(expense.amount().to_string(), "50");
        assert_eq!(expense.category(), "Food");
        assert_eq!(expense.date(), "2024-01-01");
        assert_eq!(expense.notes(), "");
    }

    #[test]
    fn test_validate_rejects_bad_amounts() {
        for amount in ["0", "0.00", "-5", "", "  ", "abc", "5 dollars"] {
            let e = validate(amount, "Food", "2024-01-01").unwrap_err();
            assert_eq!(e.error_type(), ErrorType::Validation, "amount '{amount}'");
        }
    }

    #[test]
    fn test_validate_amount_limits() {
        let fields = validate("1000000000000", "Rent", "2024-01-01").unwrap();
        assert_eq!(fields.amount, Amount::max());
        let fields = validate("1e3", "Rent", "2024-01-01").unwrap();
        assert_eq!(fields.amount.to_string(), "1000");

        for amount in [
            "1000000000000.01",
            "79228162514264337593543950335",
            "1e29",
            "1e-40",
        ] {
            let e = validate(amount, "Rent", "2024-01-01").unwrap_err();
            assert!(e.is_validation(), "amount '{amount}' gave {e:?}");
        }
    }

    #[test]
    fn test_validate_reduces_precision() {
        let fields = validate("0.12345678901234567891", "Food", "2024-01-01").unwrap();
        assert_eq!(fields.amount.to_string(), "0.12345678901234568");
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(validate("10", "", "2024-01-01").unwrap_err().is_validation());
        assert!(validate("10", "Food", "").unwrap_err().is_validation());
    }

    #[test]
    fn test_expense_json_shape() {
        let fields = ExpenseInput::new("30", "Travel", "2024-01-02", "taxi")
            .validate()
            .unwrap();
        let expense = Expense::new(ExpenseId::new(1704153600000), fields);
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1704153600000i64,
                "amount": 30.0,
                "category": "Travel",
                "date": "2024-01-02",
                "notes": "taxi"
            })
        );
    }

    #[test]
    fn test_expense_missing_notes_reads_as_empty() {
        let json = r#"{"id": 7, "amount": 12.5, "category": "Food", "date": "2024-03-01"}"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id(), ExpenseId::new(7));
        assert_eq!(expense.notes(), "");
    }

    #[test]
    fn test_to_input_prefills_fields() {
        let fields = validate("12.50", "Food", "2024-03-01").unwrap();
        let expense = Expense::new(ExpenseId::new(3), fields);
        let input = expense.to_input();
        assert_eq!(input, ExpenseInput::new("12.5", "Food", "2024-03-01", ""));
    }

    #[test]
    fn test_expense_id_from_str() {
        assert_eq!(ExpenseId::from_str(" 42 ").unwrap(), ExpenseId::new(42));
        assert!(ExpenseId::from_str("x").is_err());
    }
}
