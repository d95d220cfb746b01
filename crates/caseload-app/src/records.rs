// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use caseload_view::{FieldValue, Record, RecordKey};

use crate::{CaseSummary, ClientSummary, Notice};

/// Projects a case into the flat record the list machinery works on. Absent
/// optionals stay absent so they sort last and group under the fallback
/// header instead of as empty strings.
pub fn case_record(case: &CaseSummary) -> Record {
    let mut record = Record::new(RecordKey::new(case.id.get()))
        .with_text("case", case.case_number.clone())
        .with_value(
            "client",
            FieldValue::nested([
                ("name", FieldValue::text(case.client_name.clone())),
                ("reference", FieldValue::text(case.client_reference.clone())),
            ]),
        )
        .with_text("status", case.status.label())
        .with_text("priority", case.priority.label())
        .with_text("program", case.program.label());

    if let Some(staff) = &case.staff {
        record = record.with_text("staff", staff.clone());
    }
    if let Some(region) = case.jurisdiction {
        record = record.with_text("jurisdiction", region.label());
    }
    if let Some(due) = case.due_date {
        record = record.with_text("due", due.to_string());
    }
    if let Some(cents) = case.benefit_cents {
        record = record.with_value("amount", FieldValue::Money(cents));
    }
    if !case.flags.is_empty() {
        let flags = case.flags.iter().map(|flag| FieldValue::text(flag.clone()));
        record = record.with_value("flags", FieldValue::items(flags));
    }
    record
}

pub fn client_record(client: &ClientSummary) -> Record {
    let mut record = Record::new(RecordKey::new(client.id.get()))
        .with_text("client", client.name.clone())
        .with_text("reference", client.reference.clone())
        .with_value(
            "contact",
            FieldValue::nested([
                ("email", FieldValue::text(client.email.clone())),
                ("phone", FieldValue::text(client.phone.clone())),
            ]),
        )
        .with_text("jurisdiction", client.jurisdiction.label())
        .with_value("cases", FieldValue::Integer(client.open_cases));

    if !client.programs.is_empty() {
        let programs = client
            .programs
            .iter()
            .map(|program| FieldValue::text(program.label()));
        record = record.with_value("programs", FieldValue::items(programs));
    }
    if let Some(contacted) = client.last_contact {
        record = record.with_text("contacted", contacted.to_string());
    }
    record
}

pub fn notice_record(notice: &Notice) -> Record {
    let mut record = Record::new(RecordKey::new(notice.id.get()))
        .with_text("title", notice.title.clone())
        .with_text("category", notice.category.label())
        .with_text("received", notice.received.to_string())
        .with_value("ack", FieldValue::Flag(notice.acknowledged));

    if let Some(case_number) = &notice.case_number {
        record = record.with_text("case", case_number.clone());
    }
    record
}
