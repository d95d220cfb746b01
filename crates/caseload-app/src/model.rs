// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use caseload_view::{ColumnKind, ColumnSpec, GroupField, Layout, ViewportClass};

use crate::{CaseId, ClientId, NoticeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Intake,
    Pending,
    Active,
    Suspended,
    Closed,
}

impl CaseStatus {
    pub const ALL: [Self; 5] = [
        Self::Intake,
        Self::Pending,
        Self::Active,
        Self::Suspended,
        Self::Closed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "intake" => Some(Self::Intake),
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Intake => "Intake",
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasePriority {
    Urgent,
    High,
    Standard,
    Low,
}

impl CasePriority {
    pub const ALL: [Self; 4] = [Self::Urgent, Self::High, Self::Standard, Self::Low];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Standard => "standard",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "standard" => Some(Self::Standard),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Standard => "Standard",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Program {
    IncomeSupport,
    EmploymentServices,
    ChildCare,
    HealthBenefits,
    Housing,
}

impl Program {
    pub const ALL: [Self; 5] = [
        Self::IncomeSupport,
        Self::EmploymentServices,
        Self::ChildCare,
        Self::HealthBenefits,
        Self::Housing,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomeSupport => "income_support",
            Self::EmploymentServices => "employment_services",
            Self::ChildCare => "child_care",
            Self::HealthBenefits => "health_benefits",
            Self::Housing => "housing",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IncomeSupport => "Income Support",
            Self::EmploymentServices => "Employment Services",
            Self::ChildCare => "Child Care",
            Self::HealthBenefits => "Health Benefits",
            Self::Housing => "Housing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Northern,
    Eastern,
    Central,
    Western,
    Coastal,
}

impl Region {
    pub const ALL: [Self; 5] = [
        Self::Northern,
        Self::Eastern,
        Self::Central,
        Self::Western,
        Self::Coastal,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Northern => "Northern",
            Self::Eastern => "Eastern",
            Self::Central => "Central",
            Self::Western => "Western",
            Self::Coastal => "Coastal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeCategory {
    Deadline,
    Assignment,
    Policy,
    System,
}

impl NoticeCategory {
    pub const ALL: [Self; 4] = [
        Self::Deadline,
        Self::Assignment,
        Self::Policy,
        Self::System,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Deadline => "Deadline",
            Self::Assignment => "Assignment",
            Self::Policy => "Policy",
            Self::System => "System",
        }
    }
}

/// One benefit case as the worklist sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub case_number: String,
    pub client_name: String,
    pub client_reference: String,
    pub status: CaseStatus,
    pub priority: CasePriority,
    /// Assigned worker, if any.
    pub staff: Option<String>,
    pub jurisdiction: Option<Region>,
    pub program: Program,
    pub due_date: Option<Date>,
    /// Monthly benefit amount in cents.
    pub benefit_cents: Option<i64>,
    pub opened: Date,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: ClientId,
    pub name: String,
    pub reference: String,
    pub phone: String,
    pub email: String,
    pub jurisdiction: Region,
    pub programs: Vec<Program>,
    pub open_cases: i64,
    pub last_contact: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub category: NoticeCategory,
    pub case_number: Option<String>,
    pub received: Date,
    pub acknowledged: bool,
}

/// Top-level pages of the app. `as_str` doubles as the stable storage key
/// prefix for persisted view settings, so the names never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Cases,
    Clients,
    Notices,
}

impl PageKind {
    pub const ALL: [Self; 3] = [Self::Cases, Self::Clients, Self::Notices];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::Clients => "clients",
            Self::Notices => "notices",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cases" => Some(Self::Cases),
            "clients" => Some(Self::Clients),
            "notices" => Some(Self::Notices),
            _ => None,
        }
    }

    pub const fn tabs(self) -> &'static [PageTab] {
        match self {
            Self::Cases => &[
                PageTab::AssignedCases,
                PageTab::UnassignedCases,
                PageTab::ClosedCases,
            ],
            Self::Clients => &[PageTab::ActiveClients, PageTab::ArchivedClients],
            Self::Notices => &[PageTab::UnreadNotices, PageTab::AllNotices],
        }
    }

    pub const fn columns(self) -> &'static [ColumnSpec] {
        match self {
            Self::Cases => CASE_COLUMNS,
            Self::Clients => CLIENT_COLUMNS,
            Self::Notices => NOTICE_COLUMNS,
        }
    }

    /// Group fields that make sense on the page. Empty means the page does
    /// not offer grouping.
    pub const fn group_fields(self) -> &'static [GroupField] {
        match self {
            Self::Cases => &[
                GroupField::Status,
                GroupField::Priority,
                GroupField::Staff,
                GroupField::Jurisdiction,
            ],
            Self::Clients => &[GroupField::Jurisdiction],
            Self::Notices => &[],
        }
    }
}

/// Dataset tabs within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageTab {
    AssignedCases,
    UnassignedCases,
    ClosedCases,
    ActiveClients,
    ArchivedClients,
    UnreadNotices,
    AllNotices,
}

impl PageTab {
    pub const fn page(self) -> PageKind {
        match self {
            Self::AssignedCases | Self::UnassignedCases | Self::ClosedCases => PageKind::Cases,
            Self::ActiveClients | Self::ArchivedClients => PageKind::Clients,
            Self::UnreadNotices | Self::AllNotices => PageKind::Notices,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AssignedCases => "assigned",
            Self::UnassignedCases => "unassigned",
            Self::ClosedCases => "closed",
            Self::ActiveClients => "active",
            Self::ArchivedClients => "archived",
            Self::UnreadNotices => "unread",
            Self::AllNotices => "all",
        }
    }

    /// The layout a tab starts in before anyone customizes it. Archive-style
    /// tabs read better as dense lists; working tabs get the table, or cards
    /// when the viewport is narrow.
    pub const fn default_layout(self, viewport: ViewportClass) -> Layout {
        match self {
            Self::AssignedCases | Self::UnassignedCases | Self::ActiveClients => {
                if viewport.is_mobile {
                    Layout::Card
                } else {
                    Layout::Table
                }
            }
            Self::ClosedCases | Self::ArchivedClients | Self::UnreadNotices | Self::AllNotices => {
                Layout::List
            }
        }
    }

    pub fn admits_case(self, case: &CaseSummary) -> bool {
        match self {
            Self::AssignedCases => case.status != CaseStatus::Closed && case.staff.is_some(),
            Self::UnassignedCases => case.status != CaseStatus::Closed && case.staff.is_none(),
            Self::ClosedCases => case.status == CaseStatus::Closed,
            _ => false,
        }
    }

    pub fn admits_client(self, client: &ClientSummary) -> bool {
        match self {
            Self::ActiveClients => client.open_cases > 0,
            Self::ArchivedClients => client.open_cases == 0,
            _ => false,
        }
    }

    pub fn admits_notice(self, notice: &Notice) -> bool {
        match self {
            Self::UnreadNotices => !notice.acknowledged,
            Self::AllNotices => true,
            _ => false,
        }
    }
}

pub const CASE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        key: "case",
        label: "case",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "client",
        label: "client",
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
        key: "priority",
        label: "priority",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "staff",
        label: "staff",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "jurisdiction",
        label: "region",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "program",
        label: "program",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "due",
        label: "due",
        kind: ColumnKind::Date,
        sortable: true,
    },
    ColumnSpec {
        key: "amount",
        label: "amount",
        kind: ColumnKind::Number,
        sortable: true,
    },
    ColumnSpec {
        key: "flags",
        label: "flags",
        kind: ColumnKind::Text,
        sortable: false,
    },
];

pub const CLIENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        key: "client",
        label: "client",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "reference",
        label: "ref",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "contact",
        label: "contact",
        kind: ColumnKind::Text,
        sortable: false,
    },
    ColumnSpec {
        key: "jurisdiction",
        label: "region",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "programs",
        label: "programs",
        kind: ColumnKind::Text,
        sortable: false,
    },
    ColumnSpec {
        key: "cases",
        label: "open",
        kind: ColumnKind::Number,
        sortable: true,
    },
    ColumnSpec {
        key: "contacted",
        label: "contacted",
        kind: ColumnKind::Date,
        sortable: true,
    },
];

pub const NOTICE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        key: "title",
        label: "title",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "category",
        label: "category",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "case",
        label: "case",
        kind: ColumnKind::Text,
        sortable: true,
    },
    ColumnSpec {
        key: "received",
        label: "received",
        kind: ColumnKind::Date,
        sortable: true,
    },
    ColumnSpec {
        key: "ack",
        label: "ack",
        kind: ColumnKind::Flag,
        sortable: true,
    },
];
