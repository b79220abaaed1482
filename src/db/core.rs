use once_cell::sync::Lazy;
use rusqlite::Connection;
use rusqlite_migration::{MigrationDefinitionError, Migrations, M};
use std::path::{Path, PathBuf};

use crate::constants::DB_FILE;
use crate::error::{Result, RosterError};

const TEACHERS_SCHEMA: &str = r#"
        CREATE TABLE IF NOT EXISTS teachers (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          subject TEXT NOT NULL,
          group_name TEXT NOT NULL
        );
      "#;

// Database schema migrations
static MIGRATIONS: Lazy<Migrations<'static>> =
  Lazy::new(|| Migrations::new(vec![M::up(TEACHERS_SCHEMA)]));

/// Location of the database file used by both the app and the seeding utility.
pub fn get_db_path() -> PathBuf {
  PathBuf::from(DB_FILE)
}

/// Opens the SQLite file at `path`, creating it if absent.
pub fn open_connection(path: &Path) -> Result<Connection> {
  log::info!("[db] Database path: {:?}", path);
  Connection::open(path).map_err(|source| RosterError::Connection {
    path: path.to_path_buf(),
    source,
  })
}

/// Brings the schema up to date and makes sure the teachers table exists,
/// whatever `user_version` the file claims. Safe to call any number of times.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
  log::info!("[db] Applying database migrations...");
  match MIGRATIONS.to_latest(conn) {
    Ok(()) => log::info!("[db] Migrations applied successfully."),
    Err(rusqlite_migration::Error::MigrationDefinition(
      MigrationDefinitionError::DatabaseTooFarAhead,
    )) => log::warn!("[db] Database schema is newer than this build, keeping it as is."),
    Err(e) => {
      log::error!("[db] Migration failed: {}", e);
      return Err(RosterError::from(e));
    }
  }

  conn.execute_batch(TEACHERS_SCHEMA)?;
  Ok(())
}

/// Number of tables called `name` in the schema. Used to check idempotence.
pub fn table_count(conn: &Connection, name: &str) -> Result<i64> {
  let count = conn.query_row(
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    [name],
    |row| row.get(0),
  )?;
  Ok(count)
}
