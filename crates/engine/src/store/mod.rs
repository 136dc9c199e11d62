//! Storage seams of the engine.
//!
//! The engine only talks to storage through these traits, so tests can swap
//! in fakes. [`SqlStore`] is the sea-orm implementation used by the binary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Budget, Expense, Identity, MoneyCents, ResultEngine, User};

mod sql;

pub use sql::SqlStore;

#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// The owner's active budget, if any.
    async fn find_active_budget(&self, owner: &Identity) -> ResultEngine<Option<Budget>>;

    async fn insert_budget(&self, budget: &Budget) -> ResultEngine<()>;

    /// Updates amount and `updated_at` of an active budget.
    ///
    /// Returns the number of affected rows.
    async fn update_budget_amount(
        &self,
        id: Uuid,
        amount: MoneyCents,
        updated_at: DateTime<Utc>,
    ) -> ResultEngine<u64>;

    /// Flips `active` to false if `id` is an active budget owned by `owner`.
    ///
    /// Returns the number of affected rows.
    async fn deactivate_budget(
        &self,
        id: Uuid,
        owner: &Identity,
        updated_at: DateTime<Utc>,
    ) -> ResultEngine<u64>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Sum of all the owner's expenses, zero when there are none.
    async fn sum_expenses(&self, owner: &Identity) -> ResultEngine<MoneyCents>;

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()>;

    /// Deletes `id` if owned by `owner`. Returns the number of deleted rows.
    async fn delete_expense(&self, id: Uuid, owner: &Identity) -> ResultEngine<u64>;

    /// All the owner's expenses, most recent first.
    async fn list_expenses(&self, owner: &Identity) -> ResultEngine<Vec<Expense>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, email: &Identity) -> ResultEngine<Option<User>>;

    async fn insert_user(&self, user: &User) -> ResultEngine<()>;
}
