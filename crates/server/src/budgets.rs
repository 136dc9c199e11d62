//! Budget API endpoints

use api_types::{
    Deleted,
    budget::{BudgetNew, BudgetResponse, BudgetSaved, BudgetView},
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{EngineError, Identity};
use uuid::Uuid;

use crate::{ServerError, parse_amount, server::ServerState};

fn budget_view(view: engine::BudgetView) -> BudgetView {
    BudgetView {
        id: view.id,
        email: view.owner.to_string(),
        amount: view.amount.as_major(),
        total_expenses: view.total_expenses.as_major(),
        remaining: view.remaining.as_major(),
        created_at: view.created_at,
        updated_at: view.updated_at,
        active: view.active,
    }
}

/// Create the caller's budget, or update the active one.
///
/// Answers 201 on creation and 200 on update.
pub async fn upsert(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetNew>, JsonRejection>,
) -> Result<(StatusCode, Json<BudgetSaved>), ServerError> {
    let Json(payload) = payload?;
    let amount = parse_amount(payload.amount)?;

    let saved = state
        .engine
        .upsert_budget(&identity, amount, Utc::now())
        .await?;

    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(BudgetSaved {
            budget_id: saved.id,
            created: saved.created,
            amount: saved.amount.as_major(),
        }),
    ))
}

/// Balance of the active budget of `email`, which must be the caller.
pub async fn get(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<BudgetResponse>, ServerError> {
    let budget = state.engine.budget(&identity, &email).await?;

    Ok(Json(BudgetResponse {
        budget: budget.map(budget_view),
    }))
}

/// Soft-delete one of the caller's budgets.
pub async fn deactivate(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let not_found = || EngineError::KeyNotFound("budget not found or unauthorized".to_string());
    let budget_id = Uuid::parse_str(&budget_id).map_err(|_| not_found())?;

    state
        .engine
        .deactivate_budget(&identity, budget_id, Utc::now())
        .await?;

    Ok(Json(Deleted { deleted: true }))
}
