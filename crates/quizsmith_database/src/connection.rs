//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use quizsmith_error::{DatabaseError, DatabaseErrorKind};

/// Connection pool over PostgreSQL.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Establish a single connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable for the connection string.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is not set or the connection fails.
pub fn establish_connection() -> DatabaseResult<PgConnection> {
    let database_url = database_url_from_env()?;
    PgConnection::establish(&database_url).map_err(DatabaseError::from)
}

/// Build a connection pool for the given database URL.
///
/// # Errors
///
/// Returns an error if the pool cannot be initialized.
pub fn create_pool(database_url: &str) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build a connection pool from the `DATABASE_URL` environment variable.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is not set or the pool cannot be
/// initialized.
pub fn pool_from_env() -> DatabaseResult<PgPool> {
    create_pool(&database_url_from_env()?)
}

/// Apply any pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
}

fn database_url_from_env() -> DatabaseResult<String> {
    std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })
}
