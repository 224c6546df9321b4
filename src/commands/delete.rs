//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{describe, Out};
use crate::model::Expense;
use crate::session::Session;
use crate::Result;

/// Deletes an expense by id.
///
/// Deleting an id that does not exist succeeds and changes nothing. The deleted expense, if there
/// was one, is returned.
pub async fn delete(session: &mut Session, args: DeleteArgs) -> Result<Out<Option<Expense>>> {
    let removed = session.store_mut().delete(args.id).await?;
    session.rows_mut().finish(args.id);
    let message = match &removed {
        Some(expense) => format!(
            "Deleted expense {}: {}",
            expense.id(),
            describe(expense, session.currency_symbol())
        ),
        None => format!("Expense {} does not exist, nothing to delete", args.id),
    };
    Ok(Out::new(message, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_success() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        let [food, travel] = env.add_food_and_travel(&mut session).await;

        let out = delete(&mut session, DeleteArgs { id: food.id() })
            .await
            .unwrap();
        assert!(out.message().contains("Deleted expense"));
        assert_eq!(out.structure().unwrap().as_ref(), Some(&food));
        assert_eq!(session.store().all(), &[travel.clone()]);

        let reopened = env.session().await;
        assert_eq!(reopened.store().all(), &[travel]);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        let [food, travel] = env.add_food_and_travel(&mut session).await;

        delete(&mut session, DeleteArgs { id: food.id() })
            .await
            .unwrap();
        let out = delete(&mut session, DeleteArgs { id: food.id() })
            .await
            .unwrap();
        assert!(out.message().contains("nothing to delete"));
        assert_eq!(out.structure().unwrap(), &None);
        assert_eq!(session.store().all(), &[travel]);
    }
}
