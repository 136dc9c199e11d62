//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when a field fails validation (amounts, names).
//! - [`NoActiveBudget`] thrown when an expense is submitted without a budget.
//! - [`BudgetExceeded`] thrown when an expense would overflow the budget.
//! - [`KeyNotFound`] thrown when an item is not found or not owned by the
//!   caller.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`NoActiveBudget`]: EngineError::NoActiveBudget
//!  [`BudgetExceeded`]: EngineError::BudgetExceeded
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("No active budget found")]
    NoActiveBudget,
    #[error("Expense exceeds remaining budget ({remaining} left)")]
    BudgetExceeded { remaining: MoneyCents },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Password error: {0}")]
    Password(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::NoActiveBudget, Self::NoActiveBudget) => true,
            (Self::BudgetExceeded { remaining: a }, Self::BudgetExceeded { remaining: b }) => {
                a == b
            }
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a == b,
            (Self::Password(a), Self::Password(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
