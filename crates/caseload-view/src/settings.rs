// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::group::GroupField;
use crate::record::ColumnSpec;

/// Presentation layout for a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Table,
    Card,
    List,
}

impl Layout {
    pub const ALL: [Self; 3] = [Self::Table, Self::Card, Self::List];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Card => "card",
            Self::List => "list",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.as_str() == value)
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Table => Self::Card,
            Self::Card => Self::List,
            Self::List => Self::Table,
        }
    }
}

/// Outcome of a column visibility toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnToggle {
    Hidden,
    Shown,
    /// Refused: hiding would have left the view without any column.
    KeptLastVisible,
    UnknownColumn,
}

/// The user-adjustable view preferences that survive restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub layout: Layout,
    pub visible_columns: Vec<String>,
    pub group_by: Option<GroupField>,
}

impl ViewSettings {
    /// Fresh settings: every column visible, no grouping.
    pub fn defaults(layout: Layout, columns: &[ColumnSpec]) -> Self {
        Self {
            layout,
            visible_columns: columns.iter().map(|column| column.key.to_owned()).collect(),
            group_by: None,
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible_columns.iter().any(|visible| visible == key)
    }

    /// Shows or hides one column. At least one column stays visible; hiding
    /// the last one is refused rather than applied. A re-shown column returns
    /// to its canonical position in the column table, not to the end.
    pub fn toggle_column(&mut self, key: &str, columns: &[ColumnSpec]) -> ColumnToggle {
        if self.is_visible(key) {
            if self.visible_columns.len() == 1 {
                return ColumnToggle::KeptLastVisible;
            }
            self.visible_columns.retain(|visible| visible != key);
            return ColumnToggle::Hidden;
        }
        if !columns.iter().any(|column| column.key == key) {
            return ColumnToggle::UnknownColumn;
        }
        let restored: Vec<String> = columns
            .iter()
            .filter(|column| column.key == key || self.is_visible(column.key))
            .map(|column| column.key.to_owned())
            .collect();
        self.visible_columns = restored;
        ColumnToggle::Shown
    }

    pub fn show_all_columns(&mut self, columns: &[ColumnSpec]) {
        self.visible_columns = columns.iter().map(|column| column.key.to_owned()).collect();
    }
}

/// Persisted wrapper around [`ViewSettings`]: the settings plus whether the
/// layout was deliberately taken off the default.
///
/// While `layout_customized` is false the layout tracks whatever default the
/// active tab and viewport dictate; once true it stays pinned until the user
/// returns it to the current default or resets the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredViewState {
    pub view_settings: ViewSettings,
    pub layout_customized: bool,
}

impl StoredViewState {
    pub fn defaults(layout: Layout, columns: &[ColumnSpec]) -> Self {
        Self {
            view_settings: ViewSettings::defaults(layout, columns),
            layout_customized: false,
        }
    }

    /// Replaces the settings wholesale. The customized flag is recomputed
    /// only when the layout itself changed: it becomes true when the new
    /// layout differs from the current default, false when it matches.
    /// Column and grouping edits leave the flag alone.
    pub fn apply_change(&mut self, next: ViewSettings, current_default: Layout) {
        if next.layout != self.view_settings.layout {
            self.layout_customized = next.layout != current_default;
        }
        self.view_settings = next;
    }

    /// Called when the surrounding default changes (tab switch, viewport
    /// crossing a breakpoint). An uncustomized view follows the new default;
    /// a customized one keeps its pinned layout.
    pub fn follow_default(&mut self, current_default: Layout) {
        if !self.layout_customized {
            self.view_settings.layout = current_default;
        }
    }

    pub fn reset(&mut self, current_default: Layout, columns: &[ColumnSpec]) {
        *self = Self::defaults(current_default, columns);
    }

    /// Stored payloads from older builds can be structurally valid JSON yet
    /// useless; an empty column list is the one shape serde cannot reject.
    pub fn is_usable(&self) -> bool {
        !self.view_settings.visible_columns.is_empty()
    }
}
