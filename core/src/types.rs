//! DTOs for the UKG API and the union entitlements service.
//!
//! # Design
//! UKG records are untyped JSON objects (`Record`); the server assigns `id`
//! and `created_at` and otherwise stores whatever the caller sends. The
//! typed views below cover only the records the leave workflow reads and
//! default every field so partially populated records still parse.
//!
//! These types are defined independently of the mock-server crate.
//! Integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A pass-through JSON record.
pub type Record = Map<String, Value>;

/// Collection families exposed under `/api/v2/client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CompanyDocumentTypes,
    CompanyDocuments,
    CompanyFolders,
    Employees,
    TimeOffRequests,
    PtoPlans,
    AccrualBalances,
    Timesheets,
    AttendanceRecords,
    PayrollRuns,
    PayStubs,
    Earnings,
    Deductions,
    Taxes,
    Companies,
    Departments,
    JobTitles,
    Locations,
    BenefitPlans,
    Reports,
    SignatureRequests,
    SignatureTasks,
    Webhooks,
    BulkImportJobs,
    AuditLogs,
    OrgUnits,
}

impl Resource {
    /// Path of the collection, relative to the API prefix.
    pub fn path(self) -> &'static str {
        match self {
            Resource::CompanyDocumentTypes => "documents/company-document-types",
            Resource::CompanyDocuments => "documents/company-documents",
            Resource::CompanyFolders => "documents/company-folders",
            Resource::Employees => "employees",
            Resource::TimeOffRequests => "time-off/requests",
            Resource::PtoPlans => "time-off/plans",
            Resource::AccrualBalances => "time-off/accrual-balances",
            Resource::Timesheets => "time-attendance/timesheets",
            Resource::AttendanceRecords => "time-attendance/attendance-records",
            Resource::PayrollRuns => "payroll/runs",
            Resource::PayStubs => "payroll/pay-stubs",
            Resource::Earnings => "payroll/earnings",
            Resource::Deductions => "payroll/deductions",
            Resource::Taxes => "payroll/taxes",
            Resource::Companies => "companies",
            Resource::Departments => "configuration/departments",
            Resource::JobTitles => "configuration/job-titles",
            Resource::Locations => "configuration/locations",
            Resource::BenefitPlans => "benefits/plans",
            Resource::Reports => "reports",
            Resource::SignatureRequests => "esignature/requests",
            Resource::SignatureTasks => "esignature/tasks",
            Resource::Webhooks => "webhooks",
            Resource::BulkImportJobs => "bulk/import-jobs",
            Resource::AuditLogs => "audit/logs",
            Resource::OrgUnits => "organization/units",
        }
    }

    /// Path that accepts `POST` for new records. Import jobs are created
    /// through the bulk employee import endpoint rather than their listing.
    pub fn create_path(self) -> &'static str {
        match self {
            Resource::BulkImportJobs => "bulk/employees/import",
            other => other.path(),
        }
    }
}

/// Client credentials exchanged for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub client_id: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            app_id: "test_app".to_string(),
            app_secret: "test_secret".to_string(),
            client_id: "test_client".to_string(),
        }
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

fn bearer() -> String {
    "Bearer".to_string()
}

/// Cursor block of the list envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// List envelope: `{"data": [...], "pagination": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T = Record> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Filters accepted by list endpoints. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub employee_id: Option<String>,
    pub company_id: Option<String>,
    pub payroll_run_id: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListQuery {
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    pub fn between(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    /// Query pairs in the order they are emitted on the wire. Empty values
    /// are treated as absent.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("employee_id", &self.employee_id),
            ("company_id", &self.company_id),
            ("payroll_run_id", &self.payroll_run_id),
            ("status", &self.status),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Body sent with approve/reject calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Approval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A paid-time-off plan assigned to an employee.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PtoPlan {
    pub id: String,
    pub employee_id: String,
    pub leave_type: String,
    pub name: String,
}

/// Hours credited to an employee for one leave type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccrualBalance {
    pub id: String,
    pub employee_id: String,
    pub leave_type: String,
    pub available_hours: f64,
    pub as_of: Option<String>,
}

/// An entitlement row joined with the member's running balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Entitlement {
    pub entitlement_id: String,
    pub union_id: String,
    pub leave_type: String,
    pub name: String,
    pub annual_hours: f64,
    pub current_balance: f64,
    pub accrued_ytd: f64,
    pub used_ytd: f64,
    pub last_updated: Option<String>,
}

/// A recorded breach of a collective agreement rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Violation {
    pub violation_id: String,
    pub employee_id: String,
    pub union_id: String,
    pub status: String,
    pub description: String,
    pub occurred_on: Option<String>,
}

impl Violation {
    pub fn is_open(&self) -> bool {
        self.status == "open"
    }
}

/// Union-level rules the leave workflow enforces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComplianceParameters {
    pub union_id: String,
    pub max_consecutive_days: Option<u32>,
    pub min_notice_days: Option<u32>,
    pub max_annual_leave_hours: Option<f64>,
}

/// A union as listed by the entitlements service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Union {
    pub union_id: String,
    pub name: String,
    pub local_number: String,
}

/// A union membership row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UnionMember {
    pub member_id: String,
    pub union_id: String,
    pub employee_id: String,
    pub seniority_date: Option<String>,
}
