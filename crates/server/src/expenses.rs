//! Expense API endpoints

use api_types::{
    Deleted,
    expense::{ExpenseCreated, ExpenseList, ExpenseNew, ExpenseView},
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{EngineError, Expense, Identity, NewExpense};
use uuid::Uuid;

use crate::{ServerError, parse_amount, server::ServerState};

pub(crate) fn expense_view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount.as_major(),
        description: expense.description.clone(),
        created_at: expense.created_at,
    }
}

pub(crate) fn expense_list(expenses: &[Expense]) -> ExpenseList {
    let expenses: Vec<ExpenseView> = expenses.iter().map(expense_view).collect();
    ExpenseList {
        count: expenses.len(),
        expenses,
    }
}

/// Handle requests for recording a new expense against the caller's budget
pub async fn add(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let Json(payload) = payload?;
    let amount = parse_amount(payload.amount)?;

    let expense = state
        .engine
        .add_expense(
            &identity,
            NewExpense {
                amount,
                description: payload.description,
                created_at: Utc::now(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseCreated {
            expense_id: expense.id,
            amount: expense.amount.as_major(),
            description: expense.description,
            created_at: expense.created_at,
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<ExpenseList>, ServerError> {
    let expenses = state.engine.list_expenses(&identity, &email).await?;
    Ok(Json(expense_list(&expenses)))
}

pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let not_found = || EngineError::KeyNotFound("expense not found or unauthorized".to_string());
    let expense_id = Uuid::parse_str(&expense_id).map_err(|_| not_found())?;

    state.engine.delete_expense(&identity, expense_id).await?;

    Ok(Json(Deleted { deleted: true }))
}
