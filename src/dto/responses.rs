use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub time_creation: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub email_confirmed: bool,
    pub created: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ReceiptResponse {
    pub id: Uuid,
    pub total: BigDecimal,
    pub rest: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ReceiptProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub total: BigDecimal,
    pub receipt_id: Uuid,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<crate::db::models::sales_receipt::SalesReceipt> for ReceiptResponse {
    fn from(receipt: crate::db::models::sales_receipt::SalesReceipt) -> Self {
        ReceiptResponse {
            id: receipt.id,
            total: receipt.total,
            rest: receipt.rest,
            created_at: receipt.created_at,
        }
    }
}

impl From<crate::db::models::sales_receipt::SalesReceiptProduct> for ReceiptProductResponse {
    fn from(product: crate::db::models::sales_receipt::SalesReceiptProduct) -> Self {
        ReceiptProductResponse {
            id: product.id,
            title: product.title,
            price: product.price,
            quantity: product.quantity,
            total: product.total,
            receipt_id: product.receipt_id,
        }
    }
}
