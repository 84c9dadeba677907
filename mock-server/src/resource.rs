//! Collection families served under `/api/v2/client`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CompanyDocumentTypes,
    CompanyDocuments,
    CompanyFolders,
    Employees,
    EmployeeBenefits,
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
    /// Singular noun used in `"<label> not found"` errors.
    pub fn label(self) -> &'static str {
        match self {
            Resource::CompanyDocumentTypes => "Document type",
            Resource::CompanyDocuments => "Document",
            Resource::CompanyFolders => "Folder",
            Resource::Employees => "Employee",
            Resource::EmployeeBenefits => "Employee benefit",
            Resource::TimeOffRequests => "Request",
            Resource::PtoPlans => "PTO plan",
            Resource::AccrualBalances => "Accrual balance",
            Resource::Timesheets => "Timesheet",
            Resource::AttendanceRecords => "Attendance record",
            Resource::PayrollRuns => "Payroll run",
            Resource::PayStubs => "Pay stub",
            Resource::Earnings => "Earning",
            Resource::Deductions => "Deduction",
            Resource::Taxes => "Tax",
            Resource::Companies => "Company",
            Resource::Departments => "Department",
            Resource::JobTitles => "Job title",
            Resource::Locations => "Location",
            Resource::BenefitPlans => "Benefit",
            Resource::Reports => "Report",
            Resource::SignatureRequests => "Signature request",
            Resource::SignatureTasks => "Signature task",
            Resource::Webhooks => "Webhook",
            Resource::BulkImportJobs => "Import job",
            Resource::AuditLogs => "Audit log",
            Resource::OrgUnits => "Organization unit",
        }
    }

    /// Status forced onto every newly created record, if any.
    pub fn initial_status(self) -> Option<&'static str> {
        match self {
            Resource::TimeOffRequests | Resource::SignatureRequests => Some("pending"),
            Resource::Reports | Resource::BulkImportJobs => Some("processing"),
            _ => None,
        }
    }
}
