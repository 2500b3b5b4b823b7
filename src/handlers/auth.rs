// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::auth::extractors::CurrentUser;
use crate::auth::services::AuthService;
use crate::auth::session;
use crate::dto::requests::{LoginRequest, SignupRequest};
use crate::dto::responses::{SignupResponse, TokenInfo};
use crate::error::AppError;

/// POST /auth/registration
pub async fn signup(
    State(auth_service): State<Arc<AuthService>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<SignupResponse>), AppError> {
    let (user, access_token) = auth_service.signup(payload)?;

    let headers = session::store_access_token(&access_token)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(SignupResponse {
            user_id: user.id,
            user_name: user.username,
            time_creation: user.created,
        }),
    ))
}

/// POST /auth/login
///
/// Le cookie de session courant, même expiré, est passé au service pour
/// la récupération de la session précédente; la réponse le remplace.
pub async fn login(
    State(auth_service): State<Arc<AuthService>>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, HeaderMap, Json<TokenInfo>), AppError> {
    let prior_session_token = session::read_access_token(&headers);

    let access_token = auth_service.login(&payload, prior_session_token.as_deref())?;

    let out_headers = session::store_access_token(&access_token)?;

    Ok((StatusCode::OK, out_headers, Json(TokenInfo { access_token })))
}

/// POST /auth/refresh
pub async fn refresh_token(
    current: CurrentUser,
    Extension(auth_service): Extension<Arc<AuthService>>,
) -> Result<(HeaderMap, Json<TokenInfo>), AppError> {
    let refresh_token_id = current
        .refresh_token_id
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

    let access_token = auth_service.refresh(&current.user, refresh_token_id)?;

    let headers = session::store_access_token(&access_token)?;

    Ok((headers, Json(TokenInfo { access_token })))
}

/// POST /auth/logout
pub async fn logout(
    current: CurrentUser,
) -> Result<(StatusCode, HeaderMap, Json<serde_json::Value>), AppError> {
    let refresh_token_id = current
        .refresh_token_id
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

    AuthService::logout(&current.user, refresh_token_id)?;

    let headers = session::clear_access_token();

    Ok((
        StatusCode::OK,
        headers,
        Json(serde_json::json!({ "message": "Logout successful" })),
    ))
}
