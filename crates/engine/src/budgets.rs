//! The module contains `Budget` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Identity, MoneyCents, ResultEngine, util::parse_uuid};

/// A spending ceiling owned by one identity.
///
/// Only one budget per owner is `active` at a time. Resubmitting a budget
/// updates the active one in place; deleting it flips `active` to false and
/// keeps the row as history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub owner: Identity,
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl Budget {
    /// Builds a new active budget. `amount` must be > 0.
    pub fn new(owner: Identity, amount: MoneyCents, now: DateTime<Utc>) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "Amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            amount,
            created_at: now,
            updated_at: now,
            active: true,
        })
    }
}

/// Derived balance of a budget against the owner's expenses.
///
/// Never stored: recomputed on every read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetView {
    pub id: Uuid,
    pub owner: Identity,
    pub amount: MoneyCents,
    pub total_expenses: MoneyCents,
    pub remaining: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl BudgetView {
    pub fn new(budget: Budget, total_expenses: MoneyCents) -> Self {
        Self {
            id: budget.id,
            remaining: budget.amount - total_expenses,
            owner: budget.owner,
            amount: budget.amount,
            total_expenses,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
            active: budget.active,
        }
    }
}

/// Outcome of a budget submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetSaved {
    pub id: Uuid,
    /// `true` when a new budget was inserted, `false` on in-place update.
    pub created: bool,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner: ActiveValue::Set(value.owner.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            owner: Identity::new(model.owner),
            amount: MoneyCents::new(model.amount_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
            active: model.active,
        })
    }
}
