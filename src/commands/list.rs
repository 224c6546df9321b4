//! List and filter command handlers.

use crate::args::ListArgs;
use crate::commands::{describe, Out};
use crate::model::{Expense, Filter};
use crate::session::Session;
use crate::view::{RowState, Total};
use crate::Result;
use serde::Serialize;

/// The filtered list and its total.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// The filter that produced this listing.
    pub filter: Filter,
    /// The matching expenses, oldest first.
    pub rows: Vec<ListingRow>,
    /// The sum of the matching amounts with two decimals.
    pub total: Total,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingRow {
    pub expense: Expense,
    pub view: RowState,
}

/// Replaces the session's filter selectors. Empty or absent selectors clear that constraint.
pub async fn set_filter(session: &mut Session, args: ListArgs) -> Result<Out<Filter>> {
    session
        .view_mut()
        .set_filter(args.category, args.date)
        .await?;
    let filter = session.view().filter().clone();
    Ok(Out::new(describe_filter(&filter), filter))
}

/// Renders the expenses that match the session's filter, one per line, followed by their total.
pub async fn list(session: &Session) -> Result<Out<Listing>> {
    let records = session.store().all();
    let view = session.view();
    let symbol = session.currency_symbol();

    let rows: Vec<ListingRow> = view
        .filtered_records(records)
        .into_iter()
        .map(|e| ListingRow {
            expense: e.clone(),
            view: session.rows().state(e.id()),
        })
        .collect();
    let total = view.total(records);

    let mut message = format!("{}\n", describe_filter(view.filter()));
    if rows.is_empty() {
        message.push_str("No expenses\n");
    }
    for row in &rows {
        let marker = match row.view {
            RowState::Viewing => "",
            RowState::Editing(_) => " [editing]",
        };
        message.push_str(&format!(
            "{}  {}{marker}\n",
            row.expense.id(),
            describe(&row.expense, symbol)
        ));
    }
    message.push_str(&format!("Total: {symbol}{total}"));

    let listing = Listing {
        filter: view.filter().clone(),
        rows,
        total,
    };
    Ok(Out::new(message, listing))
}

fn describe_filter(filter: &Filter) -> String {
    match (&filter.category, &filter.date) {
        (None, None) => "Showing all expenses".to_string(),
        (Some(c), None) => format!("Showing expenses in '{c}'"),
        (None, Some(d)) => format!("Showing expenses on {d}"),
        (Some(c), Some(d)) => format!("Showing expenses in '{c}' on {d}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::AddArgs;
    use crate::commands::{add, begin_edit};
    use crate::test::TestEnv;

    fn filter_args(category: Option<&str>, date: Option<&str>) -> ListArgs {
        ListArgs {
            category: category.map(String::from),
            date: date.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_list_filter_and_clear() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        let [food, _] = env.add_food_and_travel(&mut session).await;

        set_filter(&mut session, filter_args(Some("Food"), None))
            .await
            .unwrap();
        let out = list(&session).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.rows.len(), 1);
        assert_eq!(listing.rows[0].expense, food);
        assert_eq!(listing.total.to_string(), "50.00");
        assert!(out.message().ends_with("Total: ₹50.00"));

        set_filter(&mut session, filter_args(Some(""), None))
            .await
            .unwrap();
        let out = list(&session).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.total.to_string(), "80.00");
        assert!(listing.filter.is_empty());
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let session = env.session().await;
        let out = list(&session).await.unwrap();
        assert!(out.message().contains("No expenses"));
        assert_eq!(out.structure().unwrap().total.to_string(), "0.00");
    }

    #[tokio::test]
    async fn test_list_shows_editing_rows() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        let [food, _] = env.add_food_and_travel(&mut session).await;
        begin_edit(&mut session, food.id()).await.unwrap();

        let out = list(&session).await.unwrap();
        assert!(out.message().contains("[editing]"));
        let listing = out.structure().unwrap();
        assert!(matches!(listing.rows[0].view, RowState::Editing(_)));
        assert_eq!(listing.rows[1].view, RowState::Viewing);
    }

    #[tokio::test]
    async fn test_filter_by_date_after_add() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        env.add_food_and_travel(&mut session).await;
        set_filter(&mut session, filter_args(None, Some("2024-01-02")))
            .await
            .unwrap();

        // The view is derived again after every mutation
        add(
            &mut session,
            AddArgs {
                amount: "12.5".to_string(),
                category: "Food".to_string(),
                date: Some("2024-01-02".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();
        let listing = list(&session).await.unwrap().structure().unwrap().clone();
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.total.to_string(), "42.50");
    }
}
