use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Budget, BudgetSaved, BudgetView, EngineError, Identity, MoneyCents, ResultEngine,
    util::ensure_positive,
};

use super::{Engine, ensure_same_identity};

impl Engine {
    /// Creates the owner's budget, or updates the active one in place.
    ///
    /// - `amount` must be > 0.
    /// - Never creates a second active budget for the same owner.
    /// - An update that touches no row is reported as a store error.
    pub async fn upsert_budget(
        &self,
        identity: &Identity,
        amount: MoneyCents,
        now: DateTime<Utc>,
    ) -> ResultEngine<BudgetSaved> {
        let amount = ensure_positive(amount)?;
        let _guard = self.locks.acquire(identity).await;

        match self.budgets.find_active_budget(identity).await? {
            Some(existing) => {
                let affected = self
                    .budgets
                    .update_budget_amount(existing.id, amount, now)
                    .await?;
                if affected == 0 {
                    return Err(EngineError::Store("failed to update budget".to_string()));
                }
                tracing::debug!(owner = %identity, budget = %existing.id, %amount, "budget updated");
                Ok(BudgetSaved {
                    id: existing.id,
                    created: false,
                    amount,
                })
            }
            None => {
                let budget = Budget::new(identity.clone(), amount, now)?;
                self.budgets.insert_budget(&budget).await?;
                tracing::debug!(owner = %identity, budget = %budget.id, %amount, "budget created");
                Ok(BudgetSaved {
                    id: budget.id,
                    created: true,
                    amount,
                })
            }
        }
    }

    /// Balance of `owner`'s active budget, `None` when no budget is set.
    ///
    /// `caller` may only read their own budget.
    pub async fn budget(&self, caller: &Identity, owner: &str) -> ResultEngine<Option<BudgetView>> {
        ensure_same_identity(caller, owner)?;

        let Some(budget) = self.budgets.find_active_budget(caller).await? else {
            return Ok(None);
        };
        let total_expenses = self.expenses.sum_expenses(caller).await?;

        Ok(Some(BudgetView::new(budget, total_expenses)))
    }

    /// Soft-deletes the caller's budget `budget_id`.
    pub async fn deactivate_budget(
        &self,
        identity: &Identity,
        budget_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let _guard = self.locks.acquire(identity).await;
        let affected = self
            .budgets
            .deactivate_budget(budget_id, identity, now)
            .await?;
        if affected == 0 {
            return Err(EngineError::KeyNotFound(
                "budget not found or unauthorized".to_string(),
            ));
        }

        tracing::debug!(owner = %identity, budget = %budget_id, "budget deactivated");
        Ok(())
    }
}
