// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Fields a list view can group by. The serialized names take part in the
/// persisted settings payload, so they never change casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Status,
    Priority,
    Staff,
    Jurisdiction,
}

impl GroupField {
    pub const ALL: [Self; 4] = [Self::Status, Self::Priority, Self::Staff, Self::Jurisdiction];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Staff => "staff",
            Self::Jurisdiction => "jurisdiction",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::Staff => "Staff",
            Self::Jurisdiction => "Jurisdiction",
        }
    }

    /// Header used for records that carry no value for the field.
    pub const fn fallback_label(self) -> &'static str {
        match self {
            Self::Status => "Unknown",
            Self::Priority => "None",
            Self::Staff => "Unassigned",
            Self::Jurisdiction => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup {
    pub label: String,
    pub records: Vec<Record>,
}

/// Partitions records by the display value of the group field. Groups appear
/// in the order their label is first seen, and members keep the incoming
/// order, so a sorted input yields sorted members under each header.
pub fn partition_records(records: &[Record], group_by: Option<GroupField>) -> Option<Vec<RecordGroup>> {
    let field = group_by?;
    let mut groups: Vec<RecordGroup> = Vec::new();
    for record in records {
        let label = group_label(record, field);
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(RecordGroup {
                label,
                records: vec![record.clone()],
            }),
        }
    }
    Some(groups)
}

fn group_label(record: &Record, field: GroupField) -> String {
    match record.field(field.as_str()) {
        Some(value) => {
            let text = value.display();
            if text.is_empty() {
                field.fallback_label().to_owned()
            } else {
                text
            }
        }
        None => field.fallback_label().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKey;

    fn record(key: i64, status: &str, staff: Option<&str>) -> Record {
        let record = Record::new(RecordKey::new(key)).with_text("status", status);
        match staff {
            Some(name) => record.with_text("staff", name),
            None => record,
        }
    }

    #[test]
    fn groups_follow_first_occurrence_order() {
        let records = vec![
            record(1, "Active", None),
            record(2, "Closed", None),
            record(3, "Active", None),
            record(4, "Intake", None),
            record(5, "Closed", None),
        ];
        let groups = partition_records(&records, Some(GroupField::Status)).unwrap();

        let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, vec!["Active", "Closed", "Intake"]);

        let active: Vec<i64> = groups[0].records.iter().map(|r| r.key().get()).collect();
        assert_eq!(active, vec![1, 3]);
    }

    #[test]
    fn missing_values_fall_back_per_field() {
        let records = vec![
            record(1, "Active", Some("Dana Cole")),
            record(2, "Active", None),
            record(3, "Active", Some("")),
        ];
        let groups = partition_records(&records, Some(GroupField::Staff)).unwrap();

        let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, vec!["Dana Cole", "Unassigned"]);
        assert_eq!(groups[1].records.len(), 2);

        assert_eq!(GroupField::Priority.fallback_label(), "None");
        assert_eq!(GroupField::Jurisdiction.fallback_label(), "Unknown");
    }

    #[test]
    fn no_group_field_means_no_partition() {
        let records = vec![record(1, "Active", None)];
        assert!(partition_records(&records, None).is_none());
    }

    #[test]
    fn empty_input_yields_empty_partition() {
        let groups = partition_records(&[], Some(GroupField::Status)).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn names_round_trip_through_parse() {
        for field in GroupField::ALL {
            assert_eq!(GroupField::parse(field.as_str()), Some(field));
        }
        assert_eq!(GroupField::parse("region"), None);
    }
}
