//! sea-orm implementation of the store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, SqlErr, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Budget, EngineError, Expense, Identity, MoneyCents, ResultEngine, User, budgets, expenses,
    users,
};

use super::{BudgetStore, ExpenseStore, UserStore};

/// Budgets, expenses and users backed by one SQL database.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl BudgetStore for SqlStore {
    async fn find_active_budget(&self, owner: &Identity) -> ResultEngine<Option<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::Owner.eq(owner.as_str()))
            .filter(budgets::Column::Active.eq(true))
            .one(&self.database)
            .await?
            .map(Budget::try_from)
            .transpose()
    }

    async fn insert_budget(&self, budget: &Budget) -> ResultEngine<()> {
        budgets::ActiveModel::from(budget)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn update_budget_amount(
        &self,
        id: Uuid,
        amount: MoneyCents,
        updated_at: DateTime<Utc>,
    ) -> ResultEngine<u64> {
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::AmountMinor, Expr::value(amount.cents()))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(updated_at))
            .filter(budgets::Column::Id.eq(id.to_string()))
            .filter(budgets::Column::Active.eq(true))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn deactivate_budget(
        &self,
        id: Uuid,
        owner: &Identity,
        updated_at: DateTime<Utc>,
    ) -> ResultEngine<u64> {
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::Active, Expr::value(false))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(updated_at))
            .filter(budgets::Column::Id.eq(id.to_string()))
            .filter(budgets::Column::Owner.eq(owner.as_str()))
            .filter(budgets::Column::Active.eq(true))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl ExpenseStore for SqlStore {
    async fn sum_expenses(&self, owner: &Identity) -> ResultEngine<MoneyCents> {
        let total: Option<Option<i64>> = expenses::Entity::find()
            .select_only()
            .column_as(
                Expr::col((expenses::Entity, expenses::Column::AmountMinor)).sum(),
                "total",
            )
            .filter(expenses::Column::Owner.eq(owner.as_str()))
            .into_tuple()
            .one(&self.database)
            .await?;

        Ok(MoneyCents::new(total.flatten().unwrap_or(0)))
    }

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn delete_expense(&self, id: Uuid, owner: &Identity) -> ResultEngine<u64> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id.to_string()))
            .filter(expenses::Column::Owner.eq(owner.as_str()))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn list_expenses(&self, owner: &Identity) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::Owner.eq(owner.as_str()))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}

#[async_trait]
impl UserStore for SqlStore {
    async fn find_user(&self, email: &Identity) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_user(&self, user: &User) -> ResultEngine<()> {
        match users::ActiveModel::from(user).insert(&self.database).await {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(EngineError::ExistingKey(user.email.to_string()))
                }
                _ => Err(err.into()),
            },
        }
    }
}
