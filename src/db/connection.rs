use super::{DbConnection, DbPool};
use anyhow::{Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use once_cell::sync::OnceCell;

static DB_POOL: OnceCell<DbPool> = OnceCell::new();

/// Construit le pool global à partir de l'URL résolue par la config.
/// À appeler une seule fois au démarrage, avant tout accès BDD.
pub fn init_pool(database_url: &str) -> Result<()> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    let pool = diesel::r2d2::Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create database pool: {}", e))?;

    DB_POOL
        .set(pool)
        .map_err(|_| anyhow!("Database pool already initialized"))
}

pub fn get_connection() -> Result<DbConnection> {
    let pool = DB_POOL
        .get()
        .ok_or_else(|| anyhow!("Database pool not initialized"))?;

    pool.get()
        .map_err(|e| anyhow!("Failed to get a connection from the pool: {}", e))
}

/// Initialise le pool avant de lancer des tests qui touchent la BDD.
/// Les tests partagent le pool: la seconde init est un no-op.
#[cfg(test)]
pub fn init_test_pool() {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let _ = init_pool(&database_url);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_connection_without_init_is_an_error_not_a_panic() {
        if DB_POOL.get().is_some() {
            // Another test already initialized the shared pool
            return;
        }

        let err = get_connection().err().unwrap();
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn get_connection_returns_pooled_connection() {
        init_test_pool();
        let result = get_connection();
        assert!(result.is_ok(), "Pool should hand out a connection");
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn pool_max_size_is_five() {
        init_test_pool();
        assert_eq!(DB_POOL.get().expect("pool initialized").max_size(), 5);
    }
}
