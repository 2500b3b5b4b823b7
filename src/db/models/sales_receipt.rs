use crate::db::schema::{sales_receipt_products, sales_receipts};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use uuid::Uuid;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sales_receipts)]
pub struct NewSalesReceipt {
    pub total: BigDecimal,
    pub rest: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = sales_receipts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesReceipt {
    pub id: Uuid,
    pub total: BigDecimal,
    pub rest: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sales_receipt_products)]
pub struct NewSalesReceiptProduct {
    pub title: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub total: BigDecimal,
    pub receipt_id: Uuid,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = sales_receipt_products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesReceiptProduct {
    pub id: Uuid,
    pub title: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub total: BigDecimal,
    pub receipt_id: Uuid,
}
