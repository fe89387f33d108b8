use axum::{
    extract::{FromRef, Query, State},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{CallbackQuery, LoginForm, RegisterForm, TokenResponse},
        jwt::JwtKeys,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/google-url", get(google_url))
        .route("/auth/google-callback", get(google_callback))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = form.username.trim();
    let user = services::authenticate(&state.db, email, &form.password)
        .await?
        .ok_or(ApiError::LoginFailed)?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = form.username.trim().to_string();
    let user = services::register(&state.db, form.name, &email, &form.password).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state))]
pub async fn google_url(State(state): State<AppState>) -> Json<String> {
    Json(state.oauth.authorization_url())
}

#[instrument(skip(state, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = services::google_login(&state, &query.code).await?;
    let token = JwtKeys::from_ref(&state).sign(user_id)?;
    info!(%user_id, "google login completed");
    Ok(Json(TokenResponse::bearer(token)))
}
