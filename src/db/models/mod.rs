pub mod audit_log;
pub mod refresh_token;
pub mod sales_receipt;
pub mod user;
