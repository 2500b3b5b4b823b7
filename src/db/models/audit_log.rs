use crate::db::schema::audit_logs;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use uuid::Uuid;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditLog<'a> {
    pub log_type: &'a str,
    pub user_id: Option<Uuid>,
    pub target_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
    pub created: DateTime<Utc>,
}

// Queryable exige toutes les colonnes, même celles jamais lues ici.
#[allow(dead_code)]
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = audit_logs)]
pub struct AuditLog {
    pub id: Uuid,
    pub log_type: String,
    pub user_id: Option<Uuid>,
    pub target_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
    pub created: DateTime<Utc>,
}
