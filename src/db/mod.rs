pub mod migrations;
pub mod queries;
pub mod store;

use anyhow::Context;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub use queries::TourFilter;
pub use store::{SqliteStore, TravelStore};

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    register_functions(&conn)?;
    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// `fold(text)` lowercases and strips diacritics so destination filters
/// match regardless of how the name was typed.
fn register_functions(conn: &Connection) -> anyhow::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|s| crate::text::fold(&s)))
        },
    )
    .context("failed to register fold() function")?;
    Ok(())
}
