//! Account endpoints

use api_types::user::{Login, LoginResponse, Profile, SignUp, SignedUp};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::Identity;

use crate::{ServerError, server::ServerState};

pub async fn sign_up(
    State(state): State<ServerState>,
    payload: Result<Json<SignUp>, JsonRejection>,
) -> Result<(StatusCode, Json<SignedUp>), ServerError> {
    let Json(payload) = payload?;

    let user = state
        .engine
        .sign_up(
            &payload.username,
            &payload.email,
            &payload.password,
            Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignedUp {
            user_id: user.id,
            email: user.email.to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServerError> {
    let Json(payload) = payload?;

    let user = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.auth.issue(&user, Utc::now())?;

    tracing::info!(user = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        email: user.email.to_string(),
        expires_in: state.auth.ttl_secs(),
    }))
}

pub async fn me(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Profile>, ServerError> {
    let user = state.engine.user(&identity).await?;

    Ok(Json(Profile {
        user_id: user.id,
        username: user.username,
        email: user.email.to_string(),
    }))
}
