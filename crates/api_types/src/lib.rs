//! Wire types of the Budgetr HTTP and WebSocket API.
//!
//! Amounts travel as JSON numbers in major units (`12.5`). Requests also
//! accept numeric strings (`"12.50"`), see [`RawAmount`]. Timestamps are
//! RFC 3339 in UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An amount as submitted by a client, before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Amount still available, set when an expense exceeds the budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}

/// Acknowledgement of a delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub amount: Option<RawAmount>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSaved {
        pub budget_id: Uuid,
        pub created: bool,
        pub amount: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub email: String,
        pub amount: f64,
        pub total_expenses: f64,
        pub remaining: f64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub active: bool,
    }

    /// `budget` is `null` when no budget is configured.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BudgetResponse {
        pub budget: Option<BudgetView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: Option<RawAmount>,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub expense_id: Uuid,
        pub amount: f64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: f64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Most recent first.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub expenses: Vec<ExpenseView>,
        pub count: usize,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUp {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignedUp {
        pub user_id: Uuid,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub email: String,
        /// Token lifetime in seconds.
        pub expires_in: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Profile {
        pub user_id: Uuid,
        pub username: String,
        pub email: String,
    }
}

pub mod ws {
    use super::*;

    use crate::expense::ExpenseView;

    /// Frames pushed to WebSocket clients.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "event", rename_all = "snake_case")]
    pub enum ServerEvent {
        /// The caller's full expense list, most recent first.
        ExpenseUpdate { expenses: Vec<ExpenseView> },
        Error { message: String },
    }

    /// Frames accepted from WebSocket clients.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "event", rename_all = "snake_case")]
    pub enum ClientEvent {
        /// Ask for a fresh `expense_update`.
        FetchExpenses,
    }
}
