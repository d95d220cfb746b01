// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::filter_records;
use crate::group::{GroupField, RecordGroup, partition_records};
use crate::record::{ColumnSpec, Record, column_for};
use crate::settings::{ColumnToggle, Layout, StoredViewState, ViewSettings};
use crate::sort::{SortConfig, SortDirection, sort_records};

/// One user intent against a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    CycleSort(String),
    ClearSort,
    AddTerm(String),
    RemoveTerm(String),
    ClearTerms,
    SetLayout(Layout),
    CycleLayout,
    SetGroupBy(Option<GroupField>),
    ToggleColumn(String),
    ShowAllColumns,
    ResetView,
    /// The surrounding default layout changed (tab switch or breakpoint
    /// crossing). Uncustomized views adopt it.
    FollowDefault(Layout),
}

/// What a command did, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    SortUnavailable,
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    TermAdded(String),
    TermExists,
    TermEmpty,
    TermRemoved(String),
    TermMissing,
    TermsCleared,
    LayoutSet(Layout),
    GroupSet(GroupField),
    GroupCleared,
    ColumnHidden(&'static str),
    ColumnShown(&'static str),
    KeepOneColumnVisible,
    UnknownColumn,
    ColumnsShown,
    ViewReset,
    DefaultFollowed(Layout),
    LayoutPinned,
}

impl ListStatus {
    pub fn message(&self) -> String {
        match self {
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::SortAsc(label) => format!("sort {label} asc"),
            Self::SortDesc(label) => format!("sort {label} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::TermAdded(term) => format!("term added: {term}"),
            Self::TermExists => "term already active".to_owned(),
            Self::TermEmpty => "empty term ignored".to_owned(),
            Self::TermRemoved(term) => format!("term removed: {term}"),
            Self::TermMissing => "no such term".to_owned(),
            Self::TermsCleared => "terms cleared".to_owned(),
            Self::LayoutSet(layout) => format!("layout {}", layout.as_str()),
            Self::GroupSet(field) => format!("grouped by {}", field.as_str()),
            Self::GroupCleared => "grouping off".to_owned(),
            Self::ColumnHidden(label) => format!("column hidden: {label}"),
            Self::ColumnShown(label) => format!("column shown: {label}"),
            Self::KeepOneColumnVisible => "keep one column visible".to_owned(),
            Self::UnknownColumn => "no such column".to_owned(),
            Self::ColumnsShown => "all columns shown".to_owned(),
            Self::ViewReset => "view reset".to_owned(),
            Self::DefaultFollowed(layout) => format!("layout default {}", layout.as_str()),
            Self::LayoutPinned => "layout pinned".to_owned(),
        }
    }

    /// Whether the command behind this status touched the persisted
    /// settings. Sort and search are session state and never persist.
    pub fn persists_settings(&self) -> bool {
        matches!(
            self,
            Self::LayoutSet(_)
                | Self::GroupSet(_)
                | Self::GroupCleared
                | Self::ColumnHidden(_)
                | Self::ColumnShown(_)
                | Self::ColumnsShown
                | Self::ViewReset
                | Self::DefaultFollowed(_)
        )
    }
}

/// Filtered, sorted, and optionally grouped records ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ListProjection {
    /// Records in display order. When grouped this is the concatenation of
    /// the groups, so a row index addresses the same record in either shape.
    pub rows: Vec<Record>,
    pub groups: Option<Vec<RecordGroup>>,
}

impl ListProjection {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All view state for one list: column universe, session sort and search,
/// and the persisted settings. Pure state; hosts feed it commands and render
/// whatever [`ListViewState::project`] returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewState {
    columns: Vec<ColumnSpec>,
    default_layout: Layout,
    sort: SortConfig,
    terms: Vec<String>,
    stored: StoredViewState,
}

impl ListViewState {
    pub fn new(columns: &[ColumnSpec], default_layout: Layout, stored: StoredViewState) -> Self {
        Self {
            columns: columns.to_vec(),
            default_layout,
            sort: SortConfig::default(),
            terms: Vec::new(),
            stored,
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn stored(&self) -> &StoredViewState {
        &self.stored
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.stored.view_settings
    }

    pub fn layout(&self) -> Layout {
        self.stored.view_settings.layout
    }

    pub fn default_layout(&self) -> Layout {
        self.default_layout
    }

    /// Column specs in visible order.
    pub fn visible_columns(&self) -> Vec<ColumnSpec> {
        self.settings()
            .visible_columns
            .iter()
            .filter_map(|key| column_for(&self.columns, key))
            .copied()
            .collect()
    }

    pub fn apply(&mut self, command: ListCommand) -> ListStatus {
        match command {
            ListCommand::CycleSort(key) => {
                let Some(column) = column_for(&self.columns, &key) else {
                    return ListStatus::SortUnavailable;
                };
                if !column.sortable {
                    return ListStatus::SortUnavailable;
                }
                let label = column.label;
                match self.sort.click(&key) {
                    Some(SortDirection::Ascending) => ListStatus::SortAsc(label),
                    Some(SortDirection::Descending) => ListStatus::SortDesc(label),
                    None => ListStatus::SortCleared,
                }
            }
            ListCommand::ClearSort => {
                self.sort.clear();
                ListStatus::SortCleared
            }
            ListCommand::AddTerm(raw) => {
                let term = raw.trim().to_owned();
                if term.is_empty() {
                    return ListStatus::TermEmpty;
                }
                if self.terms.contains(&term) {
                    return ListStatus::TermExists;
                }
                self.terms.push(term.clone());
                ListStatus::TermAdded(term)
            }
            ListCommand::RemoveTerm(term) => {
                let before = self.terms.len();
                self.terms.retain(|existing| existing != &term);
                if self.terms.len() == before {
                    ListStatus::TermMissing
                } else {
                    ListStatus::TermRemoved(term)
                }
            }
            ListCommand::ClearTerms => {
                self.terms.clear();
                ListStatus::TermsCleared
            }
            ListCommand::SetLayout(layout) => self.set_layout(layout),
            ListCommand::CycleLayout => self.set_layout(self.layout().next()),
            ListCommand::SetGroupBy(field) => {
                let mut next = self.stored.view_settings.clone();
                next.group_by = field;
                self.stored.apply_change(next, self.default_layout);
                match field {
                    Some(field) => ListStatus::GroupSet(field),
                    None => ListStatus::GroupCleared,
                }
            }
            ListCommand::ToggleColumn(key) => {
                let Some(column) = column_for(&self.columns, &key) else {
                    return ListStatus::UnknownColumn;
                };
                let label = column.label;
                let mut next = self.stored.view_settings.clone();
                match next.toggle_column(&key, &self.columns) {
                    ColumnToggle::Hidden => {
                        self.stored.apply_change(next, self.default_layout);
                        ListStatus::ColumnHidden(label)
                    }
                    ColumnToggle::Shown => {
                        self.stored.apply_change(next, self.default_layout);
                        ListStatus::ColumnShown(label)
                    }
                    ColumnToggle::KeptLastVisible => ListStatus::KeepOneColumnVisible,
                    ColumnToggle::UnknownColumn => ListStatus::UnknownColumn,
                }
            }
            ListCommand::ShowAllColumns => {
                let mut next = self.stored.view_settings.clone();
                next.show_all_columns(&self.columns);
                self.stored.apply_change(next, self.default_layout);
                ListStatus::ColumnsShown
            }
            ListCommand::ResetView => {
                self.stored.reset(self.default_layout, &self.columns);
                ListStatus::ViewReset
            }
            ListCommand::FollowDefault(layout) => {
                self.default_layout = layout;
                if self.stored.layout_customized {
                    ListStatus::LayoutPinned
                } else {
                    self.stored.follow_default(layout);
                    ListStatus::DefaultFollowed(layout)
                }
            }
        }
    }

    fn set_layout(&mut self, layout: Layout) -> ListStatus {
        let mut next = self.stored.view_settings.clone();
        next.layout = layout;
        self.stored.apply_change(next, self.default_layout);
        ListStatus::LayoutSet(layout)
    }

    /// Runs the full pipeline over a snapshot of records: filter, then sort,
    /// then partition. Grouping reorders nothing within a group, so sorted
    /// members stay sorted under their headers.
    pub fn project(&self, records: &[Record]) -> ListProjection {
        let mut rows = filter_records(records, &self.terms);
        sort_records(&mut rows, &self.sort, &self.columns);
        let groups = partition_records(&rows, self.settings().group_by);
        if let Some(groups) = &groups {
            rows = groups
                .iter()
                .flat_map(|group| group.records.iter().cloned())
                .collect();
        }
        ListProjection { rows, groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ColumnKind, FieldValue, RecordKey};

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
            key: "flags",
            label: "flags",
            kind: ColumnKind::Text,
            sortable: false,
        },
    ];

    fn state() -> ListViewState {
        ListViewState::new(
            COLUMNS,
            Layout::Table,
            StoredViewState::defaults(Layout::Table, COLUMNS),
        )
    }

    fn record(key: i64, case: &str, status: &str) -> Record {
        Record::new(RecordKey::new(key))
            .with_text("case", case)
            .with_text("status", status)
            .with_value("flags", FieldValue::items([]))
    }

    #[test]
    fn unsortable_and_unknown_columns_refuse_sort() {
        let mut state = state();
        assert_eq!(
            state.apply(ListCommand::CycleSort("flags".to_owned())),
            ListStatus::SortUnavailable
        );
        assert_eq!(
            state.apply(ListCommand::CycleSort("missing".to_owned())),
            ListStatus::SortUnavailable
        );
        assert!(state.sort().is_unsorted());
    }

    #[test]
    fn terms_are_trimmed_and_unique() {
        let mut state = state();
        assert_eq!(
            state.apply(ListCommand::AddTerm("  reed ".to_owned())),
            ListStatus::TermAdded("reed".to_owned())
        );
        assert_eq!(
            state.apply(ListCommand::AddTerm("reed".to_owned())),
            ListStatus::TermExists
        );
        assert_eq!(
            state.apply(ListCommand::AddTerm("   ".to_owned())),
            ListStatus::TermEmpty
        );
        assert_eq!(state.terms(), ["reed"]);

        assert_eq!(
            state.apply(ListCommand::RemoveTerm("other".to_owned())),
            ListStatus::TermMissing
        );
        assert_eq!(
            state.apply(ListCommand::RemoveTerm("reed".to_owned())),
            ListStatus::TermRemoved("reed".to_owned())
        );
        assert!(state.terms().is_empty());
    }

    #[test]
    fn only_setting_changes_request_persistence() {
        let mut state = state();
        assert!(!state
            .apply(ListCommand::CycleSort("case".to_owned()))
            .persists_settings());
        assert!(!state
            .apply(ListCommand::AddTerm("reed".to_owned()))
            .persists_settings());
        assert!(state
            .apply(ListCommand::SetLayout(Layout::List))
            .persists_settings());
        assert!(state
            .apply(ListCommand::ToggleColumn("status".to_owned()))
            .persists_settings());
        assert!(state
            .apply(ListCommand::SetGroupBy(Some(GroupField::Status)))
            .persists_settings());
        assert!(state.apply(ListCommand::ResetView).persists_settings());
    }

    #[test]
    fn cycle_layout_walks_every_layout() {
        let mut state = state();
        assert_eq!(
            state.apply(ListCommand::CycleLayout),
            ListStatus::LayoutSet(Layout::Card)
        );
        assert_eq!(
            state.apply(ListCommand::CycleLayout),
            ListStatus::LayoutSet(Layout::List)
        );
        assert_eq!(
            state.apply(ListCommand::CycleLayout),
            ListStatus::LayoutSet(Layout::Table)
        );
        // Back at the default, so the layout is no longer pinned.
        assert!(!state.stored().layout_customized);
    }

    #[test]
    fn default_changes_respect_pinned_layouts() {
        let mut state = state();
        assert_eq!(
            state.apply(ListCommand::FollowDefault(Layout::List)),
            ListStatus::DefaultFollowed(Layout::List)
        );
        assert_eq!(state.layout(), Layout::List);

        state.apply(ListCommand::SetLayout(Layout::Card));
        assert!(state.stored().layout_customized);
        assert_eq!(
            state.apply(ListCommand::FollowDefault(Layout::Table)),
            ListStatus::LayoutPinned
        );
        assert_eq!(state.layout(), Layout::Card);
        assert_eq!(state.default_layout(), Layout::Table);
    }

    #[test]
    fn projection_filters_sorts_then_groups() {
        let mut state = state();
        let records = vec![
            record(1, "IES-2026-00003", "Closed"),
            record(2, "IES-2026-00001", "Active"),
            record(3, "IES-2026-00002", "Closed"),
            record(4, "ARCH-0001", "Active"),
        ];

        state.apply(ListCommand::AddTerm("ies".to_owned()));
        state.apply(ListCommand::CycleSort("case".to_owned()));
        state.apply(ListCommand::SetGroupBy(Some(GroupField::Status)));

        let projection = state.project(&records);
        assert_eq!(projection.len(), 3);

        let groups = projection.groups.as_ref().unwrap();
        let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
        // First occurrence after sorting by case number: Active (00001) first.
        assert_eq!(labels, vec!["Active", "Closed"]);

        let display_keys: Vec<i64> = projection.rows.iter().map(|r| r.key().get()).collect();
        assert_eq!(display_keys, vec![2, 3, 1]);
    }

    #[test]
    fn visible_columns_track_settings_order() {
        let mut state = state();
        state.apply(ListCommand::ToggleColumn("case".to_owned()));
        let visible = state.visible_columns();
        let keys: Vec<&str> = visible.iter().map(|column| column.key).collect();
        assert_eq!(keys, vec!["status", "flags"]);

        state.apply(ListCommand::ShowAllColumns);
        assert_eq!(state.visible_columns().len(), COLUMNS.len());
    }
}
