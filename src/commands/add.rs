//! Add command handler.

use crate::args::AddArgs;
use crate::commands::{describe, Out};
use crate::model::{Expense, ExpenseInput};
use crate::session::Session;
use crate::Result;
use chrono::Local;

/// Records a new expense.
///
/// The id is generated from the current time. When `date` is not given, today's local date is
/// used. The new expense is returned on success.
///
/// # Errors
///
/// - Returns a validation error if the amount is not a positive number or the category or date is
///   empty. Nothing is saved in that case.
/// - Returns a storage error if the expenses cannot be saved.
pub async fn add(session: &mut Session, args: AddArgs) -> Result<Out<Expense>> {
    let date = args
        .date
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let input = ExpenseInput::new(
        args.amount,
        args.category,
        date,
        args.notes.unwrap_or_default(),
    );

    let expense = session.store_mut().add(&input).await?;
    let message = format!(
        "Added expense {}: {}",
        expense.id(),
        describe(&expense, session.currency_symbol())
    );
    Ok(Out::new(message, expense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test::TestEnv;

    fn args(amount: &str, category: &str, date: Option<&str>) -> AddArgs {
        AddArgs {
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.map(String::from),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_add_success() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;

        let out = add(&mut session, args("50", "Food", Some("2024-01-01")))
            .await
            .unwrap();
        assert!(out.message().contains("₹50.00 - Food on 2024-01-01"));
        let expense = out.structure().unwrap();
        assert_eq!(expense.notes(), "");

        // A new session reads what the first one saved
        let other = env.session().await;
        assert_eq!(other.store().all(), &[expense.clone()]);
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

        let out = add(&mut session, args("3", "Coffee", None)).await.unwrap();
        assert_eq!(out.structure().unwrap().date(), today);
    }

    #[tokio::test]
    async fn test_add_zero_is_rejected() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;

        let e = add(&mut session, args("0", "Food", Some("2024-01-01")))
            .await
            .unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Validation);
        assert!(session.store().all().is_empty());
    }
}
