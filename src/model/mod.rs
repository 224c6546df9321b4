//! Types that represent the core data model, such as `Expense` and `Filter`.
mod amount;
mod expense;
mod filter;

pub use amount::{Amount, AmountError};
pub use expense::{Expense, ExpenseId, ExpenseInput};
pub use filter::Filter;
