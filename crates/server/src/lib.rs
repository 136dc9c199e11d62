use api_types::{ErrorBody, RawAmount};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, MoneyCents};

pub use auth::{AuthError, Claims, JwtAuth};
pub use hub::ExpenseHub;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod auth;
mod budgets;
mod expenses;
mod hub;
mod server;
mod users;
mod ws;

pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) | EngineError::Forbidden(_) => StatusCode::UNAUTHORIZED,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Store(_) | EngineError::Password(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::InvalidAmount(_)
        | EngineError::NoActiveBudget
        | EngineError::BudgetExceeded { .. } => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Store(msg) | EngineError::Password(msg) => {
            tracing::error!("store error: {msg}");
            "internal server error".to_string()
        }
        EngineError::InvalidAmount(msg)
        | EngineError::Unauthorized(msg)
        | EngineError::Forbidden(msg)
        | EngineError::KeyNotFound(msg) => msg,
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => {
                let remaining = match &err {
                    EngineError::BudgetExceeded { remaining } => Some(remaining.as_major()),
                    _ => None,
                };
                let status = status_for_engine_error(&err);
                let error = match err {
                    EngineError::BudgetExceeded { .. } => {
                        "Expense exceeds remaining budget".to_string()
                    }
                    other => message_for_engine_error(other),
                };
                (status, ErrorBody { error, remaining })
            }
            ServerError::Auth(err) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: err.to_string(),
                    remaining: None,
                },
            ),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    remaining: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServerError {
    fn from(value: axum::extract::rejection::JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

/// Validate a client amount: present, numeric, at most two decimals.
///
/// Positivity is enforced by the engine.
pub(crate) fn parse_amount(raw: Option<RawAmount>) -> Result<MoneyCents, ServerError> {
    let amount = match raw {
        None => {
            return Err(ServerError::Generic(
                "Missing required field: amount".to_string(),
            ));
        }
        Some(RawAmount::Number(value)) => MoneyCents::try_from_major(value)?,
        Some(RawAmount::Text(text)) => text.parse::<MoneyCents>()?,
    };
    Ok(amount)
}
