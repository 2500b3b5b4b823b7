use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::sales_receipt::{
    NewSalesReceipt, NewSalesReceiptProduct, SalesReceipt, SalesReceiptProduct,
};
use crate::db::schema::{sales_receipt_products, sales_receipts};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

pub struct SalesReceiptRepository;

impl SalesReceiptRepository {
    /// Ouvre un reçu vide pour l'utilisateur.
    pub fn create(user_id: Uuid) -> Result<SalesReceipt, RepositoryError> {
        let mut conn = get_connection()?;

        let new_receipt = NewSalesReceipt {
            total: BigDecimal::from(0),
            rest: BigDecimal::from(0),
            created_at: Utc::now(),
            user_id,
        };

        diesel::insert_into(sales_receipts::table)
            .values(&new_receipt)
            .get_result::<SalesReceipt>(&mut conn)
            .map_err(Into::into)
    }

    pub fn find_by_id(id: Uuid) -> Result<Option<SalesReceipt>, RepositoryError> {
        let mut conn = get_connection()?;

        sales_receipts::table
            .filter(sales_receipts::id.eq(id))
            .first::<SalesReceipt>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Ajoute une ligne produit; le total est dérivé, jamais fourni par le client.
    pub fn add_product(
        receipt_id: Uuid,
        title: String,
        price: BigDecimal,
        quantity: BigDecimal,
    ) -> Result<SalesReceiptProduct, RepositoryError> {
        let mut conn = get_connection()?;

        let total = &price * &quantity;
        let new_product = NewSalesReceiptProduct {
            title,
            price,
            quantity,
            total,
            receipt_id,
        };

        diesel::insert_into(sales_receipt_products::table)
            .values(&new_product)
            .get_result::<SalesReceiptProduct>(&mut conn)
            .map_err(Into::into)
    }

    /// Supprime le reçu et ses lignes produit.
    pub fn delete(id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection()?;

        diesel::delete(
            sales_receipt_products::table.filter(sales_receipt_products::receipt_id.eq(id)),
        )
        .execute(&mut conn)?;
        diesel::delete(sales_receipts::table.filter(sales_receipts::id.eq(id)))
            .execute(&mut conn)?;

        Ok(())
    }
}
