// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use caseload_app::{
    CaseId, CasePriority, CaseStatus, CaseSummary, ClientId, ClientSummary, Notice,
    NoticeCategory, NoticeId, Program, Region,
};
use time::{Date, Duration, Month};

const FIRST_NAMES: [&str; 16] = [
    "Morgan", "Avery", "Jordan", "Riley", "Quinn", "Harper", "Rowan", "Emerson", "Sage",
    "Elliot", "Marlow", "Devon", "Kendall", "Ari", "Blake", "Tatum",
];

const LAST_NAMES: [&str; 16] = [
    "Reed",
    "Calloway",
    "Whitfield",
    "Nakamura",
    "Osei",
    "Vance",
    "Delgado",
    "Pruitt",
    "Lindqvist",
    "Okafor",
    "Marsh",
    "Bellamy",
    "Navarro",
    "Hale",
    "Iverson",
    "Crane",
];

const STAFF_NAMES: [&str; 8] = [
    "Dana Cole",
    "Imani Walker",
    "Theo Brandt",
    "Lucia Ferrara",
    "Sam Whitaker",
    "Noor Haddad",
    "Felix Arroyo",
    "Greta Lindh",
];

const CASE_FLAGS: [&str; 6] = [
    "documents missing",
    "appeal pending",
    "priority review",
    "address returned",
    "verification overdue",
    "third party payee",
];

const EMAIL_DOMAINS: [&str; 3] = ["example.net", "example.org", "mail.example"];

const DEADLINE_TITLES: [&str; 4] = [
    "Verification due",
    "Renewal window closing",
    "Appeal response due",
    "Quarterly report overdue",
];

const ASSIGNMENT_TITLES: [&str; 3] = [
    "Case transferred to you",
    "New intake assigned",
    "Coverage reassignment",
];

const POLICY_TITLES: [&str; 3] = [
    "Rate table update",
    "Policy bulletin 26-04",
    "Procedure change: renewals",
];

const SYSTEM_TITLES: [&str; 3] = [
    "Scheduled maintenance window",
    "Document scanner restored",
    "Portal sync delayed",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator for demo caseloads. Same seed, same data, every
/// run, so tests can assert against generated rows.
#[derive(Debug, Clone)]
pub struct CaseFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl CaseFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.rng.next_u64() % 100 < percent
    }

    fn date_between(&mut self, start: Date, end: Date) -> Date {
        let start_day = start.to_julian_day();
        let end_day = end.to_julian_day();
        if end_day <= start_day {
            return start;
        }
        let span = (end_day - start_day) as u64;
        let offset = (self.rng.next_u64() % (span + 1)) as i32;
        Date::from_julian_day(start_day + offset).expect("valid julian day")
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn client(&mut self, id: i64) -> ClientSummary {
        let name = self.person_name();
        let email_user = name.to_lowercase().replace(' ', ".");
        let domain = self.pick(&EMAIL_DOMAINS);
        let region = Region::ALL[self.rng.int_n(Region::ALL.len())];

        let program_count = 1 + self.rng.int_n(3);
        let program_start = self.rng.int_n(Program::ALL.len());
        let programs: Vec<Program> = (0..program_count)
            .map(|offset| Program::ALL[(program_start + offset) % Program::ALL.len()])
            .collect();

        let last_contact = if self.chance(70) {
            Some(self.date_between(
                reference_today() - Duration::days(180),
                reference_today(),
            ))
        } else {
            None
        };

        ClientSummary {
            id: ClientId::new(id),
            name,
            reference: format!("C-{:06}", 100_000 + id),
            phone: format!("555-{:04}", self.int_range_i64(100, 9_900)),
            email: format!("{email_user}@{domain}"),
            jurisdiction: region,
            programs,
            open_cases: 0,
            last_contact,
        }
    }

    pub fn case(&mut self, id: i64, client: &ClientSummary) -> CaseSummary {
        let status = CaseStatus::ALL[self.rng.int_n(CaseStatus::ALL.len())];
        let priority = CasePriority::ALL[self.rng.int_n(CasePriority::ALL.len())];
        let program = client.programs[self.rng.int_n(client.programs.len())];

        let staff = if self.chance(75) {
            Some(self.pick(&STAFF_NAMES).to_owned())
        } else {
            None
        };
        let jurisdiction = if self.chance(90) {
            Some(client.jurisdiction)
        } else {
            None
        };
        let due_date = if self.chance(70) {
            Some(self.date_between(
                reference_today() - Duration::days(10),
                reference_today() + Duration::days(60),
            ))
        } else {
            None
        };
        let benefit_cents = if self.chance(80) {
            Some(self.int_range_i64(40_000, 250_000))
        } else {
            None
        };

        let mut flags = Vec::new();
        if self.chance(30) {
            flags.push(self.pick(&CASE_FLAGS).to_owned());
            if self.chance(30) {
                let extra = self.pick(&CASE_FLAGS).to_owned();
                if !flags.contains(&extra) {
                    flags.push(extra);
                }
            }
        }

        CaseSummary {
            id: CaseId::new(id),
            case_number: format!("IES-{REFERENCE_YEAR}-{id:05}"),
            client_name: client.name.clone(),
            client_reference: client.reference.clone(),
            status,
            priority,
            staff,
            jurisdiction,
            program,
            due_date,
            benefit_cents,
            opened: self.date_between(
                reference_today() - Duration::days(730),
                reference_today(),
            ),
            flags,
        }
    }

    pub fn notice(&mut self, id: i64, case_number: Option<String>) -> Notice {
        let category = NoticeCategory::ALL[self.rng.int_n(NoticeCategory::ALL.len())];
        let title = match category {
            NoticeCategory::Deadline => self.pick(&DEADLINE_TITLES),
            NoticeCategory::Assignment => self.pick(&ASSIGNMENT_TITLES),
            NoticeCategory::Policy => self.pick(&POLICY_TITLES),
            NoticeCategory::System => self.pick(&SYSTEM_TITLES),
        };

        Notice {
            id: NoticeId::new(id),
            title: title.to_owned(),
            category,
            case_number,
            received: self.date_between(
                reference_today() - Duration::days(45),
                reference_today(),
            ),
            acknowledged: self.chance(50),
        }
    }
}

/// Everything a demo session works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoData {
    pub cases: Vec<CaseSummary>,
    pub clients: Vec<ClientSummary>,
    pub notices: Vec<Notice>,
}

/// Builds a consistent demo dataset: cases reference generated clients,
/// client open-case counts match the cases, and every tab has at least one
/// row when the counts allow it.
pub fn demo_data(seed: u64, cases: usize, clients: usize, notices: usize) -> DemoData {
    let mut faker = CaseFaker::new(seed);

    // Cases need a client to reference.
    let client_count = if cases > 0 { clients.max(1) } else { clients };
    let clients_list: Vec<ClientSummary> = (0..client_count)
        .map(|index| faker.client(index as i64 + 1))
        .collect();

    let mut cases_list: Vec<CaseSummary> = (0..cases)
        .map(|index| {
            let client = &clients_list[faker.int_n(clients_list.len())];
            faker.case(index as i64 + 1, client)
        })
        .collect();

    // Keep every case tab populated on small datasets.
    if cases_list.len() >= 3 {
        if !cases_list.iter().any(|case| case.status == CaseStatus::Closed) {
            if let Some(last) = cases_list.last_mut() {
                last.status = CaseStatus::Closed;
            }
        }
        if !cases_list
            .iter()
            .any(|case| case.status != CaseStatus::Closed && case.staff.is_none())
        {
            if let Some(open) = cases_list
                .iter_mut()
                .find(|case| case.status != CaseStatus::Closed)
            {
                open.staff = None;
            }
        }
    }

    let mut clients_list = clients_list;
    for client in &mut clients_list {
        client.open_cases = cases_list
            .iter()
            .filter(|case| {
                case.client_reference == client.reference && case.status != CaseStatus::Closed
            })
            .count() as i64;
    }

    let mut notices_list: Vec<Notice> = (0..notices)
        .map(|index| {
            let case_number = if faker.chance(60) && !cases_list.is_empty() {
                let case = &cases_list[faker.int_n(cases_list.len())];
                Some(case.case_number.clone())
            } else {
                None
            };
            faker.notice(index as i64 + 1, case_number)
        })
        .collect();

    if !notices_list.is_empty() && notices_list.iter().all(|notice| notice.acknowledged) {
        notices_list[0].acknowledged = false;
    }

    DemoData {
        cases: cases_list,
        clients: clients_list,
        notices: notices_list,
    }
}

pub fn reference_today() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::March, 1).expect("valid calendar date")
}
