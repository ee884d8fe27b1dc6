use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AuthResponse, ForgotPasswordRequest, MeResponse, ResetPasswordRequest, SigninRequest,
            SignupRequest,
        },
        extractors::AuthUser,
        services::{self, Session},
    },
    error::AppError,
    http::{MessageResponse, Payload},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

fn auth_response(session: Session) -> Json<AuthResponse> {
    Json(AuthResponse {
        success: true,
        token: session.token,
        user: session.user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Payload(payload): Payload<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session =
        services::signup(&state, &payload.email, &payload.password, &payload.name).await?;
    Ok((StatusCode::CREATED, auth_response(session)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Payload(payload): Payload<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = services::signin(&state, &payload.email, &payload.password).await?;
    Ok(auth_response(session))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Payload(payload): Payload<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::request_password_reset(&state, &payload.email).await?;
    Ok(MessageResponse::ok("Password reset email sent"))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Payload(payload): Payload<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::complete_password_reset(&state, &payload.token, &payload.password).await?;
    Ok(MessageResponse::ok("Password reset successful"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = services::current_user(&state, user_id).await?;
    Ok(Json(MeResponse {
        success: true,
        user: user.into(),
    }))
}
