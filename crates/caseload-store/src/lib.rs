// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use caseload_view::{ColumnSpec, Layout, StoredViewState};

pub const APP_NAME: &str = "caseload";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("view_settings", &["key", "value", "updated_at"])];

/// The key/value surface view settings persist through. The sqlite store
/// backs normal runs; tests and ephemeral runs use the in-memory one.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Sqlite-backed preference store.
pub struct PrefStore {
    conn: Connection,
}

impl PrefStore {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open preference database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory preference database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the schema on a fresh database; on an existing one, verifies
    /// the tables this build needs are present.
    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(
                    "
                    CREATE TABLE view_settings (
                      key TEXT PRIMARY KEY,
                      value TEXT NOT NULL,
                      updated_at TEXT NOT NULL
                    );
                    ",
                )
                .context("create schema")?;
        }
        Ok(())
    }
}

impl KeyValueStore for PrefStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM view_settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read view setting {key}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO view_settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert view setting {key}"))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage key for one page's view settings.
pub fn view_state_key(page_key: &str) -> String {
    format!("{page_key}-view-settings")
}

/// Loads the persisted view state for a page. Payloads that are missing,
/// malformed, or structurally unusable silently yield the defaults; only a
/// failing read surfaces as an error, and callers recover from that with the
/// defaults too.
pub fn load_view_state(
    store: &dyn KeyValueStore,
    page_key: &str,
    default_layout: Layout,
    columns: &[ColumnSpec],
) -> Result<StoredViewState> {
    let fallback = StoredViewState::defaults(default_layout, columns);
    let Some(raw) = store.get(&view_state_key(page_key))? else {
        return Ok(fallback);
    };
    match serde_json::from_str::<StoredViewState>(&raw) {
        Ok(state) if state.is_usable() => Ok(state),
        _ => Ok(fallback),
    }
}

pub fn save_view_state(
    store: &dyn KeyValueStore,
    page_key: &str,
    state: &StoredViewState,
) -> Result<()> {
    let payload = serde_json::to_string(state)
        .with_context(|| format!("serialize view state for {page_key}"))?;
    store.set(&view_state_key(page_key), &payload)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CASELOAD_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CASELOAD_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("caseload.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("preference database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if path.starts_with("file:") {
        bail!("preference database path {path:?} uses file: URI syntax; pass a plain path");
    }
    if path.contains("://") {
        bail!("preference database path {path:?} looks like a URL; pass a filesystem path");
    }
    if path.contains('?') {
        bail!("preference database path {path:?} contains '?'; remove query parameters");
    }

    Ok(())
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "preference database is missing required table `{table}`; point CASELOAD_DB_PATH at a caseload database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_validation_rejects_uri_shapes() {
        assert!(validate_db_path(":memory:").is_ok());
        assert!(validate_db_path("/tmp/prefs.db").is_ok());

        validate_db_path("").expect_err("empty path");
        validate_db_path("file:prefs.db").expect_err("file uri");
        validate_db_path("https://example.com/prefs.db").expect_err("url");
        validate_db_path("/tmp/prefs.db?mode=ro").expect_err("query params");
    }

    #[test]
    fn view_state_keys_are_page_scoped() {
        assert_eq!(view_state_key("cases"), "cases-view-settings");
        assert_eq!(view_state_key("notices"), "notices-view-settings");
    }
}
