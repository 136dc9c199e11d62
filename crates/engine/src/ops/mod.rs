use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, Identity, ResultEngine,
    locks::OwnerLocks,
    notify::{ExpenseEvent, ExpenseNotifier, NoopNotifier},
    store::{BudgetStore, ExpenseStore, SqlStore, UserStore},
};

mod budgets;
mod expenses;
mod users;

pub use expenses::NewExpense;

/// Budget and expense workflows over injected stores.
pub struct Engine {
    budgets: Arc<dyn BudgetStore>,
    expenses: Arc<dyn ExpenseStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn ExpenseNotifier>,
    locks: OwnerLocks,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Publish the owner's current expense list.
    ///
    /// Failures are logged and swallowed.
    async fn notify_expenses(&self, identity: &Identity) {
        let expenses = match self.expenses.list_expenses(identity).await {
            Ok(expenses) => expenses,
            Err(err) => {
                tracing::warn!(owner = %identity, "skipping expense notification: {err}");
                return;
            }
        };

        let event = ExpenseEvent {
            identity: identity.clone(),
            expenses,
        };
        if let Err(err) = self.notifier.publish(event) {
            tracing::debug!(owner = %identity, "expense notification dropped: {err}");
        }
    }
}

/// Only the owner may read their own budget and expenses.
fn ensure_same_identity(caller: &Identity, requested: &str) -> ResultEngine<()> {
    if !caller.matches(requested) {
        return Err(EngineError::Forbidden(
            "cannot access another user's data".to_string(),
        ));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    budgets: Option<Arc<dyn BudgetStore>>,
    expenses: Option<Arc<dyn ExpenseStore>>,
    users: Option<Arc<dyn UserStore>>,
    notifier: Option<Arc<dyn ExpenseNotifier>>,
}

impl EngineBuilder {
    /// Use one SQL database for every store.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        let store = Arc::new(SqlStore::new(db));
        self.budget_store(store.clone())
            .expense_store(store.clone())
            .user_store(store)
    }

    pub fn budget_store(mut self, store: Arc<dyn BudgetStore>) -> EngineBuilder {
        self.budgets = Some(store);
        self
    }

    pub fn expense_store(mut self, store: Arc<dyn ExpenseStore>) -> EngineBuilder {
        self.expenses = Some(store);
        self
    }

    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> EngineBuilder {
        self.users = Some(store);
        self
    }

    /// Where expense changes are pushed. Defaults to [`NoopNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn ExpenseNotifier>) -> EngineBuilder {
        self.notifier = Some(notifier);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let missing = |name: &str| EngineError::Store(format!("missing {name} store"));

        Ok(Engine {
            budgets: self.budgets.ok_or_else(|| missing("budget"))?,
            expenses: self.expenses.ok_or_else(|| missing("expense"))?,
            users: self.users.ok_or_else(|| missing("user"))?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier)),
            locks: OwnerLocks::default(),
        })
    }
}
