//! Budget tracking engine.
//!
//! The [`Engine`] owns the budget and expense workflows: budget upsert and
//! soft delete, balance aggregation, and expense admission against the active
//! budget. Storage and notifications are injected through the traits in
//! [`store`] and [`notify`].

pub use budgets::{Budget, BudgetSaved, BudgetView};
pub use error::EngineError;
pub use expenses::Expense;
pub use identity::Identity;
pub use money::MoneyCents;
pub use notify::{ExpenseEvent, ExpenseNotifier, NoopNotifier, NotifyError};
pub use ops::{Engine, EngineBuilder, NewExpense};
pub use store::{BudgetStore, ExpenseStore, SqlStore, UserStore};
pub use users::User;

mod budgets;
mod error;
mod expenses;
mod identity;
mod locks;
mod money;
pub mod notify;
mod ops;
mod password;
pub mod store;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
