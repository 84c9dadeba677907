//! Union entitlements service.
//!
//! Read-only tables of unions, members, entitlement definitions, member
//! balances, violations and compliance parameters. Served on its own
//! listener without authentication; responses are bare JSON.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::ServerError;

#[derive(Debug, Clone, Serialize)]
pub struct Union {
    pub union_id: String,
    pub name: String,
    pub local_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub member_id: String,
    pub union_id: String,
    pub employee_id: String,
    pub seniority_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitlementDef {
    pub entitlement_id: String,
    pub union_id: String,
    pub leave_type: String,
    pub name: String,
    pub annual_hours: f64,
}

#[derive(Debug, Clone)]
pub struct MemberBalance {
    pub member_id: String,
    pub entitlement_id: String,
    pub current_balance: f64,
    pub accrued_ytd: f64,
    pub used_ytd: f64,
    pub last_updated: String,
}

/// An entitlement definition joined with one member's balance.
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementRow {
    #[serde(flatten)]
    pub entitlement: EntitlementDef,
    pub current_balance: f64,
    pub accrued_ytd: f64,
    pub used_ytd: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub violation_id: String,
    pub employee_id: String,
    pub union_id: String,
    pub status: String,
    pub description: String,
    pub occurred_on: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceParameters {
    pub union_id: String,
    pub max_consecutive_days: u32,
    pub min_notice_days: u32,
    pub max_annual_leave_hours: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EntitlementsDb {
    pub unions: Vec<Union>,
    pub members: Vec<Member>,
    pub entitlements: Vec<EntitlementDef>,
    pub balances: Vec<MemberBalance>,
    pub violations: Vec<Violation>,
    pub compliance: Vec<ComplianceParameters>,
}

impl EntitlementsDb {
    /// Entitlement rows for one member.
    pub fn member_entitlements(&self, member_id: &str) -> Vec<EntitlementRow> {
        self.balances
            .iter()
            .filter(|balance| balance.member_id == member_id)
            .filter_map(|balance| {
                let entitlement = self
                    .entitlements
                    .iter()
                    .find(|e| e.entitlement_id == balance.entitlement_id)?;
                Some(EntitlementRow {
                    entitlement: entitlement.clone(),
                    current_balance: balance.current_balance,
                    accrued_ytd: balance.accrued_ytd,
                    used_ytd: balance.used_ytd,
                    last_updated: balance.last_updated.clone(),
                })
            })
            .collect()
    }

    /// Entitlement rows across every membership the employee holds.
    pub fn employee_entitlements(&self, employee_id: &str) -> Vec<EntitlementRow> {
        self.members
            .iter()
            .filter(|member| member.employee_id == employee_id)
            .flat_map(|member| self.member_entitlements(&member.member_id))
            .collect()
    }

    pub fn employee_violations(
        &self,
        employee_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Vec<Violation> {
        self.violations
            .iter()
            .filter(|v| v.employee_id == employee_id)
            .filter(|v| start_date.map_or(true, |start| v.occurred_on.as_str() >= start))
            .filter(|v| end_date.map_or(true, |end| v.occurred_on.as_str() <= end))
            .cloned()
            .collect()
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

/// The service's fixed sample tables.
pub fn sample_db() -> EntitlementsDb {
    EntitlementsDb {
        unions: vec![
            Union { union_id: s("U100"), name: s("International Association of Machinists"), local_number: s("42") },
            Union { union_id: s("U200"), name: s("Service Employees Union"), local_number: s("1199") },
        ],
        members: vec![
            Member { member_id: s("M1"), union_id: s("U100"), employee_id: s("EMP001"), seniority_date: s("2023-01-15") },
            Member { member_id: s("M3"), union_id: s("U100"), employee_id: s("EMP003"), seniority_date: s("2021-03-10") },
        ],
        entitlements: vec![
            EntitlementDef { entitlement_id: s("E1"), union_id: s("U100"), leave_type: s("vacation"), name: s("Annual Vacation"), annual_hours: 120.0 },
            EntitlementDef { entitlement_id: s("E2"), union_id: s("U100"), leave_type: s("sick"), name: s("Sick Leave"), annual_hours: 40.0 },
            EntitlementDef { entitlement_id: s("E3"), union_id: s("U200"), leave_type: s("vacation"), name: s("Annual Vacation"), annual_hours: 160.0 },
        ],
        balances: vec![
            MemberBalance { member_id: s("M1"), entitlement_id: s("E1"), current_balance: 72.0, accrued_ytd: 16.0, used_ytd: 8.0, last_updated: s("2024-01-31") },
            MemberBalance { member_id: s("M1"), entitlement_id: s("E2"), current_balance: 32.0, accrued_ytd: 8.0, used_ytd: 0.0, last_updated: s("2024-01-31") },
            MemberBalance { member_id: s("M3"), entitlement_id: s("E1"), current_balance: 40.0, accrued_ytd: 16.0, used_ytd: 24.0, last_updated: s("2024-01-31") },
        ],
        violations: vec![
            Violation { violation_id: s("V1"), employee_id: s("EMP001"), union_id: s("U100"), status: s("resolved"), description: s("Missed rest break"), occurred_on: s("2023-08-14") },
            Violation { violation_id: s("V2"), employee_id: s("EMP003"), union_id: s("U100"), status: s("open"), description: s("Overtime cap exceeded"), occurred_on: s("2024-01-12") },
        ],
        compliance: vec![
            ComplianceParameters { union_id: s("U100"), max_consecutive_days: 10, min_notice_days: 14, max_annual_leave_hours: 160.0 },
            ComplianceParameters { union_id: s("U200"), max_consecutive_days: 15, min_notice_days: 7, max_annual_leave_hours: 200.0 },
        ],
    }
}

type Db = Arc<EntitlementsDb>;

pub fn router(db: EntitlementsDb) -> Router {
    Router::new()
        .route("/unions", get(unions))
        .route("/unions/{id}/members", get(union_members))
        .route("/unions/{id}/compliance", get(compliance))
        .route("/employees/{id}/entitlements", get(employee_entitlements))
        .route("/employees/{id}/violations", get(employee_violations))
        .route("/members/{id}/entitlements", get(member_entitlements))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(db))
}

async fn unions(State(db): State<Db>) -> Json<Vec<Union>> {
    Json(db.unions.clone())
}

async fn union_members(State(db): State<Db>, Path(id): Path<String>) -> Json<Vec<Member>> {
    Json(db.members.iter().filter(|m| m.union_id == id).cloned().collect())
}

async fn compliance(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<ComplianceParameters>, ServerError> {
    db.compliance
        .iter()
        .find(|c| c.union_id == id)
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound("Union"))
}

async fn employee_entitlements(State(db): State<Db>, Path(id): Path<String>) -> Json<Vec<EntitlementRow>> {
    Json(db.employee_entitlements(&id))
}

async fn member_entitlements(State(db): State<Db>, Path(id): Path<String>) -> Json<Vec<EntitlementRow>> {
    Json(db.member_entitlements(&id))
}

async fn employee_violations(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Violation>> {
    let bound = |key: &str| query.get(key).map(String::as_str).filter(|v| !v.is_empty());
    let start = bound("start_date");
    let end = bound("end_date");
    Json(db.employee_violations(&id, start, end))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "database": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_balances_onto_definitions() {
        let db = sample_db();
        let rows = db.employee_entitlements("EMP001");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entitlement.leave_type, "vacation");
        assert_eq!(rows[0].current_balance, 72.0);
        assert!(db.employee_entitlements("EMP002").is_empty());
    }

    #[test]
    fn joined_row_serializes_flat() {
        let row = &sample_db().member_entitlements("M3")[0];
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["entitlement_id"], "E1");
        assert_eq!(json["used_ytd"], 24.0);
        assert!(json.get("entitlement").is_none());
    }

    #[test]
    fn violations_respect_window() {
        let db = sample_db();
        assert_eq!(db.employee_violations("EMP003", None, None).len(), 1);
        assert!(db
            .employee_violations("EMP003", Some("2024-02-01"), None)
            .is_empty());
        assert_eq!(
            db.employee_violations("EMP003", Some("2023-01-01"), Some("2024-01-12")).len(),
            1
        );
    }
}
