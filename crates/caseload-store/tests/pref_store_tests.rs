// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use caseload_store::{
    KeyValueStore, MemoryStore, PrefStore, load_view_state, save_view_state, view_state_key,
};
use caseload_view::{
    ColumnKind, ColumnSpec, GroupField, Layout, StoredViewState, ViewSettings,
};

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        key: "case",
        label: "case",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "status",
        label: "status",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "due",
        label: "due",
        kind: ColumnKind::Date,
        sortable: true,
    },
];

fn customized_state() -> StoredViewState {
    StoredViewState {
        view_settings: ViewSettings {
            layout: Layout::List,
            visible_columns: vec!["case".to_owned(), "due".to_owned()],
            group_by: Some(GroupField::Status),
        },
        layout_customized: true,
    }
}

#[test]
fn bootstrap_creates_schema_once() -> Result<()> {
    let store = PrefStore::open_memory()?;
    store.bootstrap()?;
    // Second bootstrap sees the existing table and validates instead.
    store.bootstrap()?;

    store.set("cases-view-settings", "{}")?;
    assert_eq!(store.get("cases-view-settings")?.as_deref(), Some("{}"));
    Ok(())
}

#[test]
fn bootstrap_rejects_foreign_databases() -> Result<()> {
    let store = PrefStore::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")?;

    let err = store.bootstrap().expect_err("schema validation should fail");
    assert!(
        err.to_string()
            .contains("missing required table `view_settings`")
    );
    Ok(())
}

#[test]
fn bootstrap_rejects_missing_required_column() -> Result<()> {
    let store = PrefStore::open_memory()?;
    store.raw_connection().execute_batch(
        "
        CREATE TABLE view_settings (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );
        ",
    )?;

    let err = store.bootstrap().expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `view_settings` is missing required columns"));
    assert!(message.contains("updated_at"));
    Ok(())
}

#[test]
fn view_state_round_trips_per_page() -> Result<()> {
    let store = PrefStore::open_memory()?;
    store.bootstrap()?;

    let state = customized_state();
    save_view_state(&store, "cases", &state)?;

    let restored = load_view_state(&store, "cases", Layout::Table, COLUMNS)?;
    assert_eq!(restored, state);

    // Other pages are untouched and come back as defaults.
    let other = load_view_state(&store, "clients", Layout::Table, COLUMNS)?;
    assert_eq!(other, StoredViewState::defaults(Layout::Table, COLUMNS));
    Ok(())
}

#[test]
fn saved_state_survives_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("caseload.db");

    {
        let store = PrefStore::open(&path)?;
        store.bootstrap()?;
        save_view_state(&store, "cases", &customized_state())?;
    }

    let store = PrefStore::open(&path)?;
    store.bootstrap()?;
    let restored = load_view_state(&store, "cases", Layout::Table, COLUMNS)?;
    assert_eq!(restored, customized_state());
    Ok(())
}

#[test]
fn malformed_payloads_fall_back_to_defaults() -> Result<()> {
    let store = PrefStore::open_memory()?;
    store.bootstrap()?;
    let fallback = StoredViewState::defaults(Layout::Table, COLUMNS);

    for payload in [
        "not json at all",
        "{\"viewSettings\":{\"layout\":\"grid\",\"visibleColumns\":[\"case\"],\
         \"groupBy\":null},\"layoutCustomized\":false}",
        "{\"viewSettings\":{\"layout\":\"table\",\"visibleColumns\":[],\
         \"groupBy\":null},\"layoutCustomized\":false}",
        "{\"viewSettings\":{\"layout\":\"table\"},\"layoutCustomized\":false}",
        "{\"layoutCustomized\":true}",
    ] {
        store.set(&view_state_key("cases"), payload)?;
        let loaded = load_view_state(&store, "cases", Layout::Table, COLUMNS)?;
        assert_eq!(loaded, fallback, "payload {payload:?} should fall back");
    }
    Ok(())
}

#[test]
fn missing_state_defaults_to_tab_layout() -> Result<()> {
    let store = MemoryStore::new();
    let loaded = load_view_state(&store, "notices", Layout::List, COLUMNS)?;
    assert_eq!(loaded.view_settings.layout, Layout::List);
    assert_eq!(loaded.view_settings.visible_columns.len(), COLUMNS.len());
    assert!(!loaded.layout_customized);
    Ok(())
}

#[test]
fn memory_store_behaves_like_the_sqlite_one() -> Result<()> {
    let store = MemoryStore::new();
    assert_eq!(store.get("cases-view-settings")?, None);

    save_view_state(&store, "cases", &customized_state())?;
    let restored = load_view_state(&store, "cases", Layout::Table, COLUMNS)?;
    assert_eq!(restored, customized_state());

    save_view_state(&store, "cases", &StoredViewState::defaults(Layout::Card, COLUMNS))?;
    let replaced = load_view_state(&store, "cases", Layout::Table, COLUMNS)?;
    assert_eq!(replaced.view_settings.layout, Layout::Card);
    Ok(())
}
