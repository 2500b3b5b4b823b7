use axum::Json;

use crate::auth::extractors::{CurrentAdmin, CurrentUser};
use crate::auth::services::AuthService;
use crate::db::repositories::sales_receipt_repository::SalesReceiptRepository;
use crate::dto::requests::{CreateReceiptProductRequest, ResetPasswordRequest, UpdateProfileRequest};
use crate::dto::responses::{ReceiptProductResponse, ReceiptResponse, UserResponse};
use crate::error::AppError;

/// GET /users/me
pub async fn me(current: CurrentUser) -> Result<Json<UserResponse>, AppError> {
    AuthService::audit("me", Some(current.user.id), None);
    Ok(Json(UserResponse::from(current.user)))
}

/// PATCH /users/change/profile
pub async fn change_profile(
    current: CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let updated = AuthService::update_profile(&current.user, payload)?;
    Ok(Json(UserResponse::from(updated)))
}

/// POST /users/make/password_reset_token
pub async fn make_password_reset_token(
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    AuthService::make_password_reset_token(&current.user)?;
    Ok(Json(serde_json::json!({
        "message": "Password reset token created"
    })))
}

/// POST /users/reset_password
pub async fn reset_password(
    current: CurrentUser,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    AuthService::reset_password(&current.user, &payload)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /users/admin
pub async fn admin_details(CurrentAdmin(admin): CurrentAdmin) -> Json<UserResponse> {
    Json(UserResponse::from(admin))
}

/// POST /users/receipt
pub async fn create_receipt(current: CurrentUser) -> Result<Json<ReceiptResponse>, AppError> {
    let receipt = SalesReceiptRepository::create(current.user.id)?;
    Ok(Json(ReceiptResponse::from(receipt)))
}

/// POST /users/product
pub async fn create_receipt_product(
    current: CurrentUser,
    Json(payload): Json<CreateReceiptProductRequest>,
) -> Result<Json<ReceiptProductResponse>, AppError> {
    if SalesReceiptRepository::find_by_id(payload.receipt_id)?.is_none() {
        return Err(AppError::not_found("Sales receipt not found"));
    }

    AuthService::audit("create_product", Some(current.user.id), Some(payload.receipt_id));

    let product = SalesReceiptRepository::add_product(
        payload.receipt_id,
        payload.title,
        payload.price,
        payload.quantity,
    )?;

    Ok(Json(ReceiptProductResponse::from(product)))
}
