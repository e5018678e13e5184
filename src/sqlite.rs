use crate::config::StoreConfig;
use crate::error::{is_unique_violation, Result, StoreError};
use crate::record::Juggler;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

const CREATE_JUGGLERS: &str =
    "CREATE TABLE IF NOT EXISTS jugglers (name TEXT UNIQUE, country TEXT, catches INT)";

const SELECT_JUGGLERS: &str = "SELECT rowid, name, country, catches FROM jugglers";

/// Owner of the one connection to the juggler database.
///
/// Construct it once with [`JugglerStore::open`] and hand out references (or
/// an `Arc`). Every operation holds the connection lock until it returns, so
/// access is serialized even when the store is shared between threads.
#[derive(Debug)]
pub struct JugglerStore {
    config: StoreConfig,
    connection: Mutex<Connection>,
}

impl JugglerStore {
    /// Open the database described by `config`, creating the table if absent.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let path = config.path().display().to_string();
        info!("opening juggler store at path: {}", path);

        let open_fault = |e: rusqlite::Error| {
            StoreError::fault(format!("error opening juggler database at {path}"), e)
        };
        let connection = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(config.path())
        }
        .map_err(open_fault)?;
        initialize_schema(&connection).map_err(open_fault)?;

        Ok(Self {
            config,
            connection: Mutex::new(connection),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory())
    }

    pub fn path(&self) -> &Path {
        self.config.path()
    }

    /// Every stored juggler, in rowid order.
    pub fn list_all(&self) -> Result<Vec<Juggler>> {
        debug!("listing jugglers");
        let conn = self.lock();
        query_jugglers(&conn, &format!("{SELECT_JUGGLERS} ORDER BY rowid"), [])
            .map_err(|e| StoreError::fault("error getting juggler records", e))
    }

    /// Store a new juggler and write the assigned rowid back into `juggler.id`.
    ///
    /// Fails with [`StoreError::Duplicate`] when the name is already taken.
    pub fn insert(&self, juggler: &mut Juggler) -> Result<()> {
        debug!(name = %juggler.name, "adding juggler");
        let mut conn = self.lock();
        match insert_row(&mut conn, juggler) {
            Ok(id) => {
                juggler.id = id;
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(name = %juggler.name, "juggler already exists");
                Err(StoreError::Duplicate {
                    message: "juggler record already exists".to_string(),
                    source: e,
                })
            }
            Err(e) => Err(StoreError::fault(format!("error adding juggler {juggler}"), e)),
        }
    }

    /// Set the catch count of the juggler called exactly `name`.
    pub fn update_catches(&self, name: &str, catches: u32) -> Result<()> {
        debug!(name, catches, "updating catches");
        let mut conn = self.lock();
        let changed = execute_in_transaction(
            &mut conn,
            "UPDATE jugglers SET catches = ?1 WHERE name = ?2",
            params![catches, name],
        )
        .map_err(|e| StoreError::fault(format!("error updating catches for {name}"), e))?;

        if changed == 0 {
            warn!(name, "update matched no juggler");
            return Err(StoreError::not_found("juggler does not exist"));
        }
        Ok(())
    }

    /// Jugglers whose name contains `term`, ignoring ASCII case.
    ///
    /// No match is an empty vector, not an error.
    pub fn search(&self, term: &str) -> Result<Vec<Juggler>> {
        debug!(term, "searching jugglers");
        let pattern = format!("%{}%", escape_like(term));
        let conn = self.lock();
        let mut jugglers = query_jugglers(
            &conn,
            &format!("{SELECT_JUGGLERS} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY rowid"),
            [pattern],
        )
        .map_err(|e| StoreError::fault(format!("error searching jugglers for {term}"), e))?;

        // LIKE stops reading the pattern at a NUL, so the rows above are only
        // a superset when `term` contains one.
        if term.contains('\0') {
            let needle = term.to_ascii_lowercase();
            jugglers.retain(|j| j.name.to_ascii_lowercase().contains(&needle));
        }
        Ok(jugglers)
    }

    /// Remove the juggler called exactly `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        debug!(name, "deleting juggler");
        let mut conn = self.lock();
        let changed = execute_in_transaction(
            &mut conn,
            "DELETE FROM jugglers WHERE name = ?1",
            params![name],
        )
        .map_err(|e| StoreError::fault(format!("error deleting juggler {name}"), e))?;

        if changed == 0 {
            warn!(name, "delete matched no juggler");
            return Err(StoreError::not_found("delete failed: juggler does not exist"));
        }
        Ok(())
    }

    /// Rowid of the juggler called exactly `name`.
    pub fn id_of(&self, name: &str) -> Result<i64> {
        debug!(name, "looking up juggler id");
        let conn = self.lock();
        conn.query_row("SELECT rowid FROM jugglers WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| StoreError::fault(format!("error looking up juggler {name}"), e))?
        .ok_or_else(|| StoreError::not_found(format!("{name} does not exist")))
    }

    // A panic mid-operation leaves no open transaction behind, so the
    // connection is still usable after poisoning.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_JUGGLERS, [])?;
    Ok(())
}

fn insert_row(conn: &mut Connection, juggler: &Juggler) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO jugglers (name, country, catches) VALUES (?1, ?2, ?3)",
        params![juggler.name, juggler.country, juggler.catches],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

fn execute_in_transaction<P: Params>(
    conn: &mut Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let changed = tx.execute(sql, params)?;
    tx.commit()?;
    Ok(changed)
}

fn query_jugglers<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<Juggler>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_juggler)?;
    let jugglers = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(jugglers)
}

// A `catches` value outside `u32` (negative, or not an integer) written by
// another client fails the conversion, and with it the whole query.
fn row_to_juggler(row: &Row<'_>) -> rusqlite::Result<Juggler> {
    Ok(Juggler {
        id: row.get(0)?,
        name: row.get(1)?,
        country: row.get(2)?,
        catches: row.get(3)?,
    })
}

/// Escape LIKE wildcards so `term` matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
