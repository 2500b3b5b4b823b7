use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::audit_log::{AuditLog, NewAuditLog};
use crate::db::schema::audit_logs;
use chrono::Utc;
use uuid::Uuid;

use diesel::prelude::*;

pub struct AuditLogRepository;

impl AuditLogRepository {
    /// Trace un événement métier (signup, login, refresh, logout, ...).
    ///
    /// Appelé en best-effort depuis les flux d'auth: un échec est loggué
    /// mais ne fait jamais échouer la mutation qui l'a déclenché.
    pub fn append(
        log_type: &str,
        user_id: Option<Uuid>,
        target_id: Option<Uuid>,
        data: Option<serde_json::Value>,
    ) -> Result<AuditLog, RepositoryError> {
        let mut conn = get_connection()?;

        let new_log = NewAuditLog {
            log_type,
            user_id,
            target_id,
            data,
            created: Utc::now(),
        };

        diesel::insert_into(audit_logs::table)
            .values(new_log)
            .get_result::<AuditLog>(&mut conn)
            .map_err(Into::into)
    }

    /// Dernières entrées d'un utilisateur, la plus récente d'abord.
    pub fn find_by_user(user_id: Uuid, limit: i64) -> Result<Vec<AuditLog>, RepositoryError> {
        let mut conn = get_connection()?;

        audit_logs::table
            .filter(audit_logs::user_id.eq(user_id))
            .order_by(audit_logs::created.desc())
            .limit(limit)
            .load::<AuditLog>(&mut conn)
            .map_err(Into::into)
    }
}
