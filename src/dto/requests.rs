use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

// -------- REQUEST DTOs --------
#[derive(Deserialize, Debug, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String, // Plain text
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String, // Plain text
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResetPasswordRequest {
    pub old_password: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateReceiptProductRequest {
    pub receipt_id: Uuid,
    pub title: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
}
