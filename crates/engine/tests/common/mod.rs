#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, ExpenseEvent, ExpenseNotifier, Identity, MoneyCents, NewExpense, NotifyError,
};
use migration::MigratorTrait;

pub async fn database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = database().await;
    let engine = Engine::builder().database(db.clone()).build().unwrap();
    (engine, db)
}

pub async fn engine_with_notifier(notifier: Arc<dyn ExpenseNotifier>) -> Engine {
    Engine::builder()
        .database(database().await)
        .notifier(notifier)
        .build()
        .unwrap()
}

pub fn alice() -> Identity {
    Identity::new("alice@example.com")
}

pub fn bob() -> Identity {
    Identity::new("bob@example.com")
}

/// Whole currency units as cents.
pub fn units(value: i64) -> MoneyCents {
    MoneyCents::new(value * 100)
}

pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
}

pub fn expense(amount: MoneyCents, minute: i64) -> NewExpense {
    NewExpense {
        amount,
        description: None,
        created_at: at(minute),
    }
}

/// Keeps every published event.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<ExpenseEvent>>,
}

impl ExpenseNotifier for RecordingNotifier {
    fn publish(&self, event: ExpenseEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct ClosedNotifier;

impl ExpenseNotifier for ClosedNotifier {
    fn publish(&self, _event: ExpenseEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Closed)
    }
}
