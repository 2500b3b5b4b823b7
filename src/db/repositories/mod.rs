pub mod audit_log_repository;
pub mod refresh_token_repository;
pub mod sales_receipt_repository;
pub mod user_repository;
