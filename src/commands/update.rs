//! Update command handlers, including the begin and cancel steps of an inline edit.

use crate::args::UpdateArgs;
use crate::commands::{describe, Out};
use crate::error::Error;
use crate::model::{Expense, ExpenseId, ExpenseInput};
use crate::session::Session;
use crate::Result;

/// Saves changes to an existing expense.
///
/// Fields that are not given keep their current values, the same way an edit form starts out
/// pre-filled. The merged fields are validated like a new expense. The expense keeps its id and
/// its position in the list, and its row returns to viewing.
///
/// # Errors
///
/// - Returns a not-found error if there is no expense with the id.
/// - Returns a validation error if the merged fields are invalid. Nothing is saved in that case.
/// - Returns a storage error if the expenses cannot be saved.
pub async fn update(session: &mut Session, args: UpdateArgs) -> Result<Out<Expense>> {
    let current = session
        .store()
        .get(args.id)
        .ok_or_else(|| Error::not_found(format!("Expense {} not found", args.id)))?
        .to_input();
    let input = ExpenseInput {
        amount: args.amount.unwrap_or(current.amount),
        category: args.category.unwrap_or(current.category),
        date: args.date.unwrap_or(current.date),
        notes: args.notes.unwrap_or(current.notes),
    };

    let expense = session.store_mut().update(args.id, &input).await?;
    session.rows_mut().finish(args.id);
    let message = format!(
        "Updated expense {}: {}",
        expense.id(),
        describe(&expense, session.currency_symbol())
    );
    Ok(Out::new(message, expense))
}

/// Switches the row of expense `id` to an edit form and returns the pre-filled draft.
pub async fn begin_edit(session: &mut Session, id: ExpenseId) -> Result<Out<ExpenseInput>> {
    let expense = session
        .store()
        .get(id)
        .cloned()
        .ok_or_else(|| Error::not_found(format!("Expense {id} not found")))?;
    let draft = session.rows_mut().begin_edit(&expense);
    Ok(Out::new(format!("Editing expense {id}"), draft))
}

/// Returns the row of expense `id` to viewing without saving.
pub async fn cancel_edit(session: &mut Session, id: ExpenseId) -> Result<Out<()>> {
    if session.rows_mut().cancel_edit(id) {
        Ok(format!("Stopped editing expense {id}").into())
    } else {
        Ok(format!("Expense {id} was not being edited").into())
    }
}
