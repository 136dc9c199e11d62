//! Expense change notifications.
//!
//! Publishing is fire-and-forget: the engine logs and drops any
//! [`NotifyError`], so a broken channel never fails a write. Subscribers
//! reconcile by re-reading the expense list.

use thiserror::Error;

use crate::{Expense, Identity};

/// Snapshot of an owner's expenses after a change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseEvent {
    pub identity: Identity,
    /// Most recent first, as returned by the expense store.
    pub expenses: Vec<Expense>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotifyError {
    #[error("no subscribers")]
    NoSubscribers,
    #[error("channel closed")]
    Closed,
}

pub trait ExpenseNotifier: Send + Sync {
    fn publish(&self, event: ExpenseEvent) -> Result<(), NotifyError>;
}

/// Notifier that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl ExpenseNotifier for NoopNotifier {
    fn publish(&self, _event: ExpenseEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
