use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tracing::Span;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{AuthError, JwtAuth, ServerError, budgets, expenses, hub::ExpenseHub, users, ws};
use engine::Engine;

#[derive(Clone, Debug)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<JwtAuth>,
    pub hub: ExpenseHub,
}

impl ServerState {
    /// `hub` must be the notifier `engine` was built with, or sockets never
    /// see any update.
    pub fn new(engine: Engine, auth: JwtAuth, hub: ExpenseHub) -> Self {
        Self {
            engine: Arc::new(engine),
            auth: Arc::new(auth),
            hub,
        }
    }
}

/// Bearer credential of a request, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingToken)?;
    let identity = state.auth.verify(&token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Request span carrying the path only. The query may hold a `?token=`
/// credential for `/ws` and must never reach the logs.
fn request_span(request: &Request) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
    )
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Budgetr API" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn router(state: ServerState, cors_origins: &[String]) -> Router {
    let protected = Router::new()
        .route("/budgets", post(budgets::upsert))
        .route("/budgets/{key}", get(budgets::get).delete(budgets::deactivate))
        .route("/expenses", post(expenses::add))
        .route("/expenses/{key}", get(expenses::list).delete(expenses::remove))
        .route("/users/me", get(users::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let api = Router::new()
        .route("/signup", post(users::sign_up))
        .route("/login", post(users::login))
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ws", get(ws::upgrade))
        .nest("/api", api)
        .layer(cors(cors_origins))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    cors_origins: &[String],
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state, cors_origins)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    cors_origins: Vec<String>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, &cors_origins, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
