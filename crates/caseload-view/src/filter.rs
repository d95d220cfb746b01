// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::record::{FieldValue, Record};

/// Case-insensitive substring match over every string field of a record,
/// descending into nested values. Numbers, flags, money, and item lists are
/// never matched; a term that looks numeric only hits fields stored as text.
pub fn record_matches(record: &Record, term: &str) -> bool {
    let needle = term.to_lowercase();
    record.values().any(|value| value_matches(value, &needle))
}

fn value_matches(value: &FieldValue, needle: &str) -> bool {
    match value {
        FieldValue::Text(text) => text.to_lowercase().contains(needle),
        FieldValue::Nested(fields) => fields.values().any(|inner| value_matches(inner, needle)),
        FieldValue::Integer(_)
        | FieldValue::Decimal(_)
        | FieldValue::Flag(_)
        | FieldValue::Money(_)
        | FieldValue::Items(_) => false,
    }
}

/// Keeps the records that match every term. Terms AND together; fields within
/// a record OR together. No terms keeps everything.
pub fn filter_records(records: &[Record], terms: &[String]) -> Vec<Record> {
    if terms.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| terms.iter().all(|term| record_matches(record, term)))
        .cloned()
        .collect()
}
