pub mod migrations;
pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

const IN_MEMORY: &str = ":memory:";

/// Opens the hotel database and brings its schema and seed rooms up to date.
/// `":memory:"` gives a private, throwaway database.
pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = if path == IN_MEMORY {
        Connection::open_in_memory()
    } else {
        Connection::open(path)
    }
    .with_context(|| format!("failed to open database at {path}"))?;

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")
        .context("failed to set database pragmas")?;
    if path != IN_MEMORY {
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("failed to enable WAL journal")?;
    }

    migrations::run_migrations(&conn)?;
    tracing::debug!(path, "hotel database ready");

    Ok(conn)
}
