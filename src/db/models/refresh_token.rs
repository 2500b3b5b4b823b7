use crate::db::schema::refresh_tokens;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use uuid::Uuid;

/// Seul type de token persisté: les access tokens ne touchent jamais la BDD.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = refresh_tokens)]
pub struct NewRefreshToken {
    pub user_id: Uuid,
    pub secret: String,
    pub token_type: String,
    pub expiration: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = refresh_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub secret: String,
    pub token_type: String,
    pub expiration: DateTime<Utc>,
    pub created: DateTime<Utc>,
}
