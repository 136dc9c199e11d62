use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    EngineError, Expense, Identity, MoneyCents, ResultEngine,
    util::{ensure_positive, normalize_optional_text},
};

use super::{Engine, ensure_same_identity};

/// Input of [`Engine::add_expense`].
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Engine {
    /// Admits an expense if it fits in the owner's active budget.
    ///
    /// The spent total is read and the expense inserted under the owner's
    /// lock, so concurrent admissions cannot overshoot the budget together.
    /// On success the owner's subscribers get a best-effort update.
    pub async fn add_expense(&self, identity: &Identity, cmd: NewExpense) -> ResultEngine<Expense> {
        let amount = ensure_positive(cmd.amount)?;
        let description = normalize_optional_text(cmd.description.as_deref());

        let expense = {
            let _guard = self.locks.acquire(identity).await;

            let budget = self
                .budgets
                .find_active_budget(identity)
                .await?
                .ok_or(EngineError::NoActiveBudget)?;
            let spent = self.expenses.sum_expenses(identity).await?;

            let total = spent
                .checked_add(amount)
                .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
            if total > budget.amount {
                return Err(EngineError::BudgetExceeded {
                    remaining: budget.amount - spent,
                });
            }

            let expense = Expense::new(identity.clone(), amount, description, cmd.created_at)?;
            self.expenses.insert_expense(&expense).await?;
            expense
        };

        tracing::debug!(owner = %identity, expense = %expense.id, %amount, "expense added");
        self.notify_expenses(identity).await;

        Ok(expense)
    }

    /// `owner`'s expenses, most recent first.
    ///
    /// `caller` may only list their own expenses.
    pub async fn list_expenses(&self, caller: &Identity, owner: &str) -> ResultEngine<Vec<Expense>> {
        ensure_same_identity(caller, owner)?;
        self.expenses.list_expenses(caller).await
    }

    /// Hard-deletes `expense_id` if it belongs to `identity`.
    pub async fn delete_expense(&self, identity: &Identity, expense_id: Uuid) -> ResultEngine<()> {
        let deleted = self.expenses.delete_expense(expense_id, identity).await?;
        if deleted == 0 {
            return Err(EngineError::KeyNotFound(
                "expense not found or unauthorized".to_string(),
            ));
        }

        tracing::debug!(owner = %identity, expense = %expense_id, "expense deleted");
        self.notify_expenses(identity).await;

        Ok(())
    }
}
