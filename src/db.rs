//! SQLite connection pool for the member store.
//!
//! Every pooled connection is configured with the pragmas in
//! [`SqlitePragmas`] before it is handed out, so the `members.team_id`
//! foreign key is always enforced.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to each connection when the pool opens it.
#[derive(Clone, Debug)]
pub struct SqlitePragmas {
    pub wal: bool,
    pub foreign_keys: bool,
    pub busy_timeout: Option<Duration>,
}

impl Default for SqlitePragmas {
    fn default() -> Self {
        Self {
            wal: true,
            foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl SqlitePragmas {
    /// The batch of `PRAGMA` statements for these settings.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        if self.wal {
            sql.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; ");
        }
        if self.foreign_keys {
            sql.push_str("PRAGMA foreign_keys = ON; ");
        }
        if let Some(timeout) = self.busy_timeout {
            sql.push_str(&format!("PRAGMA busy_timeout = {}; ", timeout.as_millis()));
        }
        sql
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let sql = self.to_sql();
        if sql.is_empty() {
            return Ok(());
        }
        conn.batch_execute(&sql)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens a pool on `database_url` with the default pragmas.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    log::debug!("opening SQLite pool at {database_url}");
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas::default()))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

/// Checks a connection out of `pool`, logging failures.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().inspect_err(|err| {
        log::error!("Failed to get connection from pool: {err}");
    })
}

#[cfg(feature = "server")]
pub const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("migrations");

/// Applies pending embedded migrations and returns how many ran.
#[cfg(feature = "server")]
pub fn run_pending_migrations(
    pool: &DbPool,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    use diesel_migrations::MigrationHarness;

    let mut conn = get_connection(pool)?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.len())
}
