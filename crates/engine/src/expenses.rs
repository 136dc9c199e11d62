//! The module contains `Expense` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Identity, MoneyCents, ResultEngine, util::parse_uuid};

/// A single spending record.
///
/// Expenses are immutable once admitted; they can only be removed by their
/// owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub owner: Identity,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        owner: Identity,
        amount: MoneyCents,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "Amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            amount,
            description,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner: ActiveValue::Set(value.owner.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            description: ActiveValue::Set(value.description.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            owner: Identity::new(model.owner),
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            created_at: model.created_at,
        })
    }
}
