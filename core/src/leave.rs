//! Union leave approval.
//!
//! # Overview
//! The workflow reads five independent inputs (PTO plans and accrual
//! balances from UKG; entitlements, violations and compliance parameters
//! from the entitlements service), evaluates them with `evaluate`, and
//! approves the time-off request only when every check passes. A denied
//! request is left untouched.
//!
//! `evaluate` is pure so the rules can be tested without a transport.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::entitlements::EntitlementsClient;
use crate::error::ApiError;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{
    AccrualBalance, Approval, ComplianceParameters, Entitlement, PtoPlan, Record, Violation,
};

/// How far before the leave starts violations still count against it.
const VIOLATION_LOOKBACK_DAYS: u64 = 365;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid leave request: {0}")]
    InvalidRequest(String),

    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: ApiError,
    },
}

/// A pending time-off request to be checked against union rules.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub request_id: String,
    pub employee_id: String,
    pub union_id: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: f64,
}

impl LeaveRequest {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.end_date < self.start_date {
            return Err(WorkflowError::InvalidRequest(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.hours.is_nan() || self.hours <= 0.0 {
            return Err(WorkflowError::InvalidRequest(format!(
                "requested hours must be positive, got {}",
                self.hours
            )));
        }
        Ok(())
    }

    /// Calendar days covered, both ends inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    fn matches(&self, leave_type: &str) -> bool {
        self.leave_type.eq_ignore_ascii_case(leave_type)
    }
}

/// Everything the rules look at, gathered up front.
#[derive(Debug, Clone, Default)]
pub struct LeaveFacts {
    pub pto_plans: Vec<PtoPlan>,
    pub balances: Vec<AccrualBalance>,
    pub entitlements: Vec<Entitlement>,
    pub violations: Vec<Violation>,
    pub compliance: ComplianceParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckFailure {
    NoPtoPlan { leave_type: String },
    InsufficientAccrual { available: f64, requested: f64 },
    NoUnionEntitlement { leave_type: String },
    OpenViolations { count: usize },
    ExceedsMaxConsecutiveDays { requested: i64, max: u32 },
    InsufficientNotice { given: i64, required: u32 },
    ExceedsAnnualLimit { projected: f64, max: f64 },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::NoPtoPlan { leave_type } => {
                write!(f, "no PTO plan covers {leave_type} leave")
            }
            CheckFailure::InsufficientAccrual { available, requested } => {
                write!(f, "accrued {available}h, requested {requested}h")
            }
            CheckFailure::NoUnionEntitlement { leave_type } => {
                write!(f, "no union entitlement with enough {leave_type} balance")
            }
            CheckFailure::OpenViolations { count } => {
                write!(f, "{count} open compliance violation(s)")
            }
            CheckFailure::ExceedsMaxConsecutiveDays { requested, max } => {
                write!(f, "{requested} consecutive days exceeds the limit of {max}")
            }
            CheckFailure::InsufficientNotice { given, required } => {
                write!(f, "{given} days notice given, {required} required")
            }
            CheckFailure::ExceedsAnnualLimit { projected, max } => {
                write!(f, "{projected}h for the year exceeds the limit of {max}h")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaveDecision {
    pub failures: Vec<CheckFailure>,
}

impl LeaveDecision {
    pub fn is_approved(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a full run: the decision plus the approved record, if any.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveOutcome {
    pub approved: bool,
    pub decision: LeaveDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

/// Apply every rule; all failures are reported, not just the first.
pub fn evaluate(request: &LeaveRequest, facts: &LeaveFacts, today: NaiveDate) -> LeaveDecision {
    let mut failures = Vec::new();

    if !facts.pto_plans.iter().any(|plan| request.matches(&plan.leave_type)) {
        failures.push(CheckFailure::NoPtoPlan {
            leave_type: request.leave_type.clone(),
        });
    }

    let available: f64 = facts
        .balances
        .iter()
        .filter(|balance| request.matches(&balance.leave_type))
        .map(|balance| balance.available_hours)
        .sum();
    if available < request.hours {
        failures.push(CheckFailure::InsufficientAccrual {
            available,
            requested: request.hours,
        });
    }

    let entitlement = facts
        .entitlements
        .iter()
        .filter(|e| request.matches(&e.leave_type))
        .find(|e| e.current_balance >= request.hours);
    if entitlement.is_none() {
        failures.push(CheckFailure::NoUnionEntitlement {
            leave_type: request.leave_type.clone(),
        });
    }

    let open = facts.violations.iter().filter(|v| v.is_open()).count();
    if open > 0 {
        failures.push(CheckFailure::OpenViolations { count: open });
    }

    let compliance = &facts.compliance;
    if let Some(max) = compliance.max_consecutive_days {
        if request.days() > i64::from(max) {
            failures.push(CheckFailure::ExceedsMaxConsecutiveDays {
                requested: request.days(),
                max,
            });
        }
    }
    if let Some(required) = compliance.min_notice_days {
        let given = (request.start_date - today).num_days();
        if given < i64::from(required) {
            failures.push(CheckFailure::InsufficientNotice { given, required });
        }
    }
    if let (Some(max), Some(entitlement)) = (compliance.max_annual_leave_hours, entitlement) {
        let projected = entitlement.used_ytd + request.hours;
        if projected > max {
            failures.push(CheckFailure::ExceedsAnnualLimit { projected, max });
        }
    }

    LeaveDecision { failures }
}

fn step<R>(step: &'static str, result: Result<R, ApiError>) -> Result<R, WorkflowError> {
    result.map_err(|source| WorkflowError::Step { step, source })
}

/// Drives the reads and the conditional approval over one transport.
pub struct LeaveWorkflow<'a, T> {
    session: &'a Session<T>,
    entitlements: EntitlementsClient,
    approver: String,
}

impl<'a, T: Transport> LeaveWorkflow<'a, T> {
    pub fn new(session: &'a Session<T>, entitlements: EntitlementsClient, approver: impl Into<String>) -> Self {
        Self {
            session,
            entitlements,
            approver: approver.into(),
        }
    }

    pub fn gather(&self, request: &LeaveRequest) -> Result<LeaveFacts, WorkflowError> {
        request.validate()?;
        let start = request.start_date.to_string();
        let end = request.end_date.to_string();
        let lookback = request
            .start_date
            .checked_sub_days(Days::new(VIOLATION_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN)
            .to_string();
        let session = self.session;
        let service = &self.entitlements;

        let pto_plans = step("pto plans", self.session.get_pto_plans(&request.employee_id))?.data;
        let balances = step(
            "accrual balances",
            self.session.get_accrual_balances(&request.employee_id, &start, &end),
        )?
        .data;
        let entitlements: Vec<Entitlement> = step(
            "union entitlements",
            session
                .send(service.build_employee_entitlements(&request.employee_id))
                .and_then(|response| service.parse_list(response)),
        )?;
        let violations: Vec<Violation> = step(
            "compliance violations",
            session
                .send(service.build_employee_violations(&request.employee_id, Some(&lookback), Some(&end)))
                .and_then(|response| service.parse_list(response)),
        )?;
        let compliance: ComplianceParameters = step(
            "compliance parameters",
            session
                .send(service.build_compliance_parameters(&request.union_id))
                .and_then(|response| service.parse_object(response)),
        )?;

        Ok(LeaveFacts {
            pto_plans,
            balances,
            entitlements,
            violations,
            compliance,
        })
    }

    /// Gather and evaluate without writing anything.
    pub fn decide(&self, request: &LeaveRequest, today: NaiveDate) -> Result<LeaveDecision, WorkflowError> {
        let facts = self.gather(request)?;
        Ok(evaluate(request, &facts, today))
    }

    /// Gather, evaluate, and approve the request when every check passes.
    pub fn run(&self, request: &LeaveRequest, today: NaiveDate) -> Result<LeaveOutcome, WorkflowError> {
        let decision = self.decide(request, today)?;
        if !decision.is_approved() {
            warn!(
                request_id = %request.request_id,
                employee_id = %request.employee_id,
                failures = decision.failures.len(),
                "leave request not eligible"
            );
            return Ok(LeaveOutcome {
                approved: false,
                decision,
                record: None,
            });
        }

        let approval = Approval {
            approved_by: Some(self.approver.clone()),
            notes: Some(format!(
                "{} {}h within union entitlement",
                request.leave_type, request.hours
            )),
        };
        let record = step(
            "approve",
            self.session.approve_time_off_request(&request.request_id, &approval),
        )?;
        info!(
            request_id = %request.request_id,
            employee_id = %request.employee_id,
            "leave request approved"
        );
        Ok(LeaveOutcome {
            approved: true,
            decision,
            record: Some(record),
        })
    }
}
