// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::record::{ColumnKind, ColumnSpec, FieldValue, Record, column_for, parse_date_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEntry {
    pub key: String,
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }
}

/// Active sort keys for one list view. A secondary entry can only exist under
/// a primary one; the variants make any other shape unrepresentable.
///
/// Not persisted: sort state lives and dies with the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortConfig {
    #[default]
    Unsorted,
    Single(SortEntry),
    Dual(SortEntry, SortEntry),
}

impl SortConfig {
    pub fn primary(&self) -> Option<&SortEntry> {
        match self {
            Self::Unsorted => None,
            Self::Single(primary) | Self::Dual(primary, _) => Some(primary),
        }
    }

    pub fn secondary(&self) -> Option<&SortEntry> {
        match self {
            Self::Unsorted | Self::Single(_) => None,
            Self::Dual(_, secondary) => Some(secondary),
        }
    }

    pub fn is_unsorted(&self) -> bool {
        matches!(self, Self::Unsorted)
    }

    /// Direction the given key currently sorts by, if it is active at all.
    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        self.primary()
            .into_iter()
            .chain(self.secondary())
            .find(|entry| entry.key == key)
            .map(|entry| entry.direction)
    }

    /// Position of the key among the active entries, for header markers:
    /// 1 for the primary, 2 for the secondary.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        if self.primary().is_some_and(|entry| entry.key == key) {
            return Some(1);
        }
        if self.secondary().is_some_and(|entry| entry.key == key) {
            return Some(2);
        }
        None
    }

    /// Advances the cycle for one header click.
    ///
    /// A fresh key starts ascending: as the only entry when nothing is
    /// sorted, as the secondary otherwise (replacing any previous secondary).
    /// Clicking an active key flips it ascending to descending; a second
    /// descending click retires it. Retiring the primary promotes the
    /// secondary, direction intact.
    ///
    /// Returns the direction the key holds afterwards, `None` once retired.
    pub fn click(&mut self, key: &str) -> Option<SortDirection> {
        let next = match std::mem::take(self) {
            Self::Unsorted => Self::Single(SortEntry::ascending(key)),
            Self::Single(primary) => {
                if primary.key == key {
                    match primary.direction {
                        SortDirection::Ascending => Self::Single(primary.descending()),
                        SortDirection::Descending => Self::Unsorted,
                    }
                } else {
                    Self::Dual(primary, SortEntry::ascending(key))
                }
            }
            Self::Dual(primary, secondary) => {
                if primary.key == key {
                    match primary.direction {
                        SortDirection::Ascending => Self::Dual(primary.descending(), secondary),
                        SortDirection::Descending => Self::Single(secondary),
                    }
                } else if secondary.key == key {
                    match secondary.direction {
                        SortDirection::Ascending => Self::Dual(primary, secondary.descending()),
                        SortDirection::Descending => Self::Single(primary),
                    }
                } else {
                    Self::Dual(primary, SortEntry::ascending(key))
                }
            }
        };
        *self = next;
        self.direction_of(key)
    }

    pub fn clear(&mut self) {
        *self = Self::Unsorted;
    }

    pub fn describe(&self, columns: &[ColumnSpec]) -> String {
        let label = |entry: &SortEntry| {
            let name = column_for(columns, &entry.key)
                .map_or_else(|| entry.key.clone(), |column| column.label.to_owned());
            format!("{name} {}", entry.direction.as_str())
        };
        match self {
            Self::Unsorted => "unsorted".to_owned(),
            Self::Single(primary) => label(primary),
            Self::Dual(primary, secondary) => format!("{}, {}", label(primary), label(secondary)),
        }
    }
}

/// Stable two-level sort. Records tied on the primary key fall through to the
/// secondary; records still tied keep their incoming order.
pub fn sort_records(records: &mut [Record], sort: &SortConfig, columns: &[ColumnSpec]) {
    let Some(primary) = sort.primary() else {
        return;
    };
    let secondary = sort.secondary();
    records.sort_by(|left, right| {
        let ordering = compare_by_entry(left, right, primary, columns);
        if ordering != Ordering::Equal {
            return ordering;
        }
        match secondary {
            Some(entry) => compare_by_entry(left, right, entry, columns),
            None => Ordering::Equal,
        }
    });
}

fn compare_by_entry(
    left: &Record,
    right: &Record,
    entry: &SortEntry,
    columns: &[ColumnSpec],
) -> Ordering {
    let kind = column_for(columns, &entry.key).map_or(ColumnKind::Text, |column| column.kind);
    // Records without the field sort last regardless of direction.
    match (left.field(&entry.key), right.field(&entry.key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left_value), Some(right_value)) => {
            let ordering = match kind {
                ColumnKind::Date => compare_as_dates(left_value, right_value),
                _ => left_value.cmp_value(right_value),
            };
            match entry.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

fn compare_as_dates(left: &FieldValue, right: &FieldValue) -> Ordering {
    match (
        parse_date_text(&left.display()),
        parse_date_text(&right.display()),
    ) {
        (Some(left), Some(right)) => left.cmp(&right),
        // Either side unparseable: leave the pair where it was.
        _ => Ordering::Equal,
    }
}
