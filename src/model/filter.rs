use crate::model::Expense;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The category and date selectors of the filtered view. `None` means no constraint.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Filter {
    /// Only show expenses with exactly this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Only show expenses on exactly this date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Filter {
    /// Creates a filter where absent or empty selectors mean "no constraint".
    pub fn new<S1, S2>(category: Option<S1>, date: Option<S2>) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            category: non_empty(category),
            date: non_empty(date),
        }
    }

    /// True if neither selector is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.date.is_none()
    }

    /// Exact, case-sensitive match on each selector that is set.
    pub fn matches(&self, expense: &Expense) -> bool {
        let category = self
            .category
            .as_deref()
            .map_or(true, |c| c == expense.category());
        let date = self.date.as_deref().map_or(true, |d| d == expense.date());
        category && date
    }
}

fn non_empty<S: Into<String>>(s: Option<S>) -> Option<String> {
    s.map(Into::into).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseId, ExpenseInput};

    fn expense(category: &str, date: &str) -> Expense {
        let fields = ExpenseInput::new("1", category, date, "").validate().unwrap();
        Expense::new(ExpenseId::new(1), fields)
    }

    #[test]
    fn test_empty_selectors_are_unset() {
        let filter = Filter::new(Some(""), Some(""));
        assert!(filter.is_empty());
        assert_eq!(filter, Filter::default());
        assert!(Filter::new(None::<String>, None::<String>).is_empty());
    }

    #[test]
    fn test_matches() {
        let food = expense("Food", "2024-01-01");
        assert!(Filter::default().matches(&food));
        assert!(Filter::new(Some("Food"), None::<&str>).matches(&food));
        assert!(Filter::new(None::<&str>, Some("2024-01-01")).matches(&food));
        assert!(Filter::new(Some("Food"), Some("2024-01-01")).matches(&food));
        assert!(!Filter::new(Some("Food"), Some("2024-01-02")).matches(&food));
        assert!(!Filter::new(Some("Travel"), None::<&str>).matches(&food));
    }

    #[test]
    fn test_matches_is_exact() {
        let food = expense("Food", "2024-01-01");
        assert!(!Filter::new(Some("food"), None::<&str>).matches(&food));
        assert!(!Filter::new(Some("Foo"), None::<&str>).matches(&food));
        assert!(!Filter::new(None::<&str>, Some("2024-01")).matches(&food));
    }
}
