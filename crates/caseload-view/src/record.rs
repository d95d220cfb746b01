// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::collections::BTreeMap;

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const PLAIN_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Identifier a host assigns to a record before projecting it into the view
/// layer. Opaque here; hosts map it back to their own entity ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey(i64);

impl RecordKey {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// How a column's values are compared when the column is a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Flag,
}

/// One column of a list view. Hosts declare these as const tables, one table
/// per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub sortable: bool,
}

pub fn column_for<'a>(columns: &'a [ColumnSpec], key: &str) -> Option<&'a ColumnSpec> {
    columns.iter().find(|column| column.key == key)
}

/// A single field value inside a projected record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
    /// Whole cents. Rendered as dollars.
    Money(i64),
    Nested(BTreeMap<String, FieldValue>),
    Items(Vec<FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn nested<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldValue)>,
    {
        Self::Nested(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn items(values: impl IntoIterator<Item = FieldValue>) -> Self {
        Self::Items(values.into_iter().collect())
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => format!("{value:.1}"),
            Self::Flag(true) => "yes".to_owned(),
            Self::Flag(false) => "no".to_owned(),
            Self::Money(cents) => format_money(*cents),
            Self::Nested(fields) => {
                let parts: Vec<String> = fields.values().map(Self::display).collect();
                parts.join(" ")
            }
            Self::Items(values) => {
                let parts: Vec<String> = values.iter().map(Self::display).collect();
                parts.join(", ")
            }
        }
    }

    pub(crate) fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(right),
            (Self::Money(left), Self::Money(right)) => left.cmp(right),
            (Self::Flag(left), Self::Flag(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right)) => {
                left.to_lowercase().cmp(&right.to_lowercase())
            }
            (left, right) => left
                .display()
                .to_lowercase()
                .cmp(&right.display().to_lowercase()),
        }
    }
}

pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let cents_component = absolute % 100;
    format!("{sign}${dollars}.{cents_component:02}")
}

/// Parses a date-like string in either plain `YYYY-MM-DD` or RFC 3339 form.
/// Anything else is not a date.
pub fn parse_date_text(value: &str) -> Option<Date> {
    let trimmed = value.trim();
    if let Ok(date) = Date::parse(trimmed, PLAIN_DATE) {
        return Some(date);
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .ok()
        .map(|stamp| stamp.date())
}

/// A flat view-layer record: a keyed map of named field values.
///
/// Hosts project their typed rows into records once per load. Everything the
/// view layer does afterwards (matching, sorting, grouping) reads only these
/// projected values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: RecordKey,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(key: RecordKey) -> Self {
        Self {
            key,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let text = FieldValue::Text(value.into());
        self.with_value(name, text)
    }

    pub fn key(&self) -> RecordKey {
        self.key
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn display(&self, name: &str) -> String {
        self.field(name).map_or_else(String::new, FieldValue::display)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.values()
    }
}
