//! UKG client API routes.
//!
//! Most collections share one set of generic handlers parameterised by
//! `Resource`; `Ops` says which methods each collection exposes.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::error::ServerError;
use crate::resource::Resource;
use crate::store::{timestamp, ListFilter, Record};
use crate::AppState;

pub const API_PREFIX: &str = "/api/v2/client";

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// List envelope. The mock never pages, so `cursor` is always null.
#[derive(Debug, Serialize)]
pub struct Page {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}

impl Page {
    fn of(data: Vec<Record>) -> Json<Page> {
        Json(Page {
            data,
            pagination: Pagination {
                cursor: None,
                has_more: false,
            },
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Ops {
    create: bool,
    item: bool,
    update: bool,
    delete: bool,
}

const LIST_ONLY: Ops = Ops { create: false, item: false, update: false, delete: false };
const READ_ONLY: Ops = Ops { create: false, item: true, update: false, delete: false };
const CREATE_READ: Ops = Ops { create: true, item: true, update: false, delete: false };
const NO_DELETE: Ops = Ops { create: true, item: true, update: true, delete: false };
const FULL: Ops = Ops { create: true, item: true, update: true, delete: true };

fn api(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(&api("/health"), get(health))
        .merge(collection(Resource::CompanyDocumentTypes, "/documents/company-document-types", FULL))
        .merge(collection(Resource::CompanyDocuments, "/documents/company-documents", FULL))
        .merge(collection(Resource::CompanyFolders, "/documents/company-folders", FULL))
        .merge(collection(Resource::Employees, "/employees", FULL))
        .route(&api("/employees/{id}/benefits"), get(employee_benefits))
        .route(&api("/employees/{id}/benefits/{benefit_id}"), get(employee_benefit))
        .merge(collection(Resource::TimeOffRequests, "/time-off/requests", NO_DELETE))
        .route(&api("/time-off/requests/{id}/approve"), post(approve_time_off))
        .route(&api("/time-off/requests/{id}/reject"), post(reject_time_off))
        .merge(collection(Resource::PtoPlans, "/time-off/plans", LIST_ONLY))
        .merge(collection(Resource::AccrualBalances, "/time-off/accrual-balances", LIST_ONLY))
        .merge(collection(Resource::Timesheets, "/time-attendance/timesheets", NO_DELETE))
        .merge(collection(Resource::AttendanceRecords, "/time-attendance/attendance-records", LIST_ONLY))
        .merge(collection(Resource::PayrollRuns, "/payroll/runs", READ_ONLY))
        .merge(collection(Resource::PayStubs, "/payroll/pay-stubs", READ_ONLY))
        .merge(collection(Resource::Earnings, "/payroll/earnings", LIST_ONLY))
        .merge(collection(Resource::Deductions, "/payroll/deductions", LIST_ONLY))
        .merge(collection(Resource::Taxes, "/payroll/taxes", LIST_ONLY))
        .merge(collection(Resource::Companies, "/companies", NO_DELETE))
        .merge(collection(Resource::Departments, "/configuration/departments", READ_ONLY))
        .merge(collection(Resource::JobTitles, "/configuration/job-titles", LIST_ONLY))
        .merge(collection(Resource::Locations, "/configuration/locations", LIST_ONLY))
        .merge(collection(Resource::BenefitPlans, "/benefits/plans", READ_ONLY))
        .merge(collection(Resource::Reports, "/reports", CREATE_READ))
        .merge(collection(Resource::SignatureRequests, "/esignature/requests", CREATE_READ))
        .merge(collection(Resource::SignatureTasks, "/esignature/tasks", READ_ONLY))
        .merge(collection(Resource::Webhooks, "/webhooks", FULL))
        .route(&api("/webhooks/{id}/test"), post(test_webhook))
        .route(&api("/bulk/employees/import"), post(bulk_employee_import))
        .merge(collection(Resource::BulkImportJobs, "/bulk/import-jobs", READ_ONLY))
        .merge(collection(Resource::AuditLogs, "/audit/logs", READ_ONLY))
        .merge(collection(Resource::OrgUnits, "/organization/units", READ_ONLY))
        .route(&api("/organization/hierarchy"), get(org_hierarchy))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    Router::new()
        .route(&api("/tokens"), post(auth::issue_token))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn collection(resource: Resource, path: &str, ops: Ops) -> Router<AppState> {
    let mut list: MethodRouter<AppState> = get(move |state: State<AppState>, query: Query<HashMap<String, String>>| {
        list_records(state, query, resource)
    });
    if ops.create {
        list = list.post(move |state: State<AppState>, body: Json<Record>| create_record(state, body, resource));
    }
    let mut router = Router::new().route(&api(path), list);

    if ops.item {
        let mut item: MethodRouter<AppState> =
            get(move |state: State<AppState>, id: Path<String>| get_record(state, id, resource));
        if ops.update {
            item = item.put(move |state: State<AppState>, id: Path<String>, body: Json<Record>| {
                update_record(state, id, body, resource)
            });
        }
        if ops.delete {
            item = item.delete(move |state: State<AppState>, id: Path<String>| delete_record(state, id, resource));
        }
        router = router.route(&format!("{}/{{id}}", api(path)), item);
    }
    router
}

async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    resource: Resource,
) -> Json<Page> {
    let filter = ListFilter::from_query(&query);
    let store = state.store.read().await;
    Page::of(store.collection(resource).list(&filter))
}

async fn create_record(
    State(state): State<AppState>,
    Json(record): Json<Record>,
    resource: Resource,
) -> (StatusCode, Json<Record>) {
    let created = state.store.write().await.create(resource, record, Utc::now());
    (StatusCode::CREATED, Json(created))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    resource: Resource,
) -> Result<Json<Record>, ServerError> {
    let store = state.store.read().await;
    store
        .collection(resource)
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound(resource.label()))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Record>,
    resource: Resource,
) -> Result<Json<Record>, ServerError> {
    let mut store = state.store.write().await;
    store
        .collection_mut(resource)
        .update(&id, patch, Utc::now())
        .map(Json)
        .ok_or(ServerError::NotFound(resource.label()))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    resource: Resource,
) -> Result<StatusCode, ServerError> {
    let mut store = state.store.write().await;
    if store.collection_mut(resource).remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(resource.label()))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": timestamp(Utc::now()) }))
}

/// Optional JSON object body; an empty body is an empty patch.
fn optional_patch(body: &Bytes) -> Result<Record, ServerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Record::new());
    }
    serde_json::from_slice(body).map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}

async fn transition_time_off(
    state: AppState,
    id: &str,
    body: &Bytes,
    status: &str,
    stamp_field: &str,
) -> Result<Json<Record>, ServerError> {
    let patch = optional_patch(body)?;
    let mut store = state.store.write().await;
    store
        .collection_mut(Resource::TimeOffRequests)
        .transition(id, status, stamp_field, patch, Utc::now())
        .map(Json)
        .ok_or(ServerError::NotFound(Resource::TimeOffRequests.label()))
}

async fn approve_time_off(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Record>, ServerError> {
    transition_time_off(state, &id, &body, "approved", "approved_at").await
}

async fn reject_time_off(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Record>, ServerError> {
    transition_time_off(state, &id, &body, "rejected", "rejected_at").await
}

async fn employee_benefits(State(state): State<AppState>, Path(id): Path<String>) -> Json<Page> {
    let store = state.store.read().await;
    Page::of(
        store
            .collection(Resource::EmployeeBenefits)
            .list(&ListFilter::field("employee_id", &id)),
    )
}

async fn employee_benefit(
    State(state): State<AppState>,
    Path((id, benefit_id)): Path<(String, String)>,
) -> Result<Json<Record>, ServerError> {
    let store = state.store.read().await;
    let field = |record: &Record, key: &str| record.get(key).and_then(Value::as_str).map(str::to_owned);
    store
        .collection(Resource::EmployeeBenefits)
        .find(|record| {
            field(record, "employee_id").as_deref() == Some(id.as_str())
                && field(record, "benefit_id").as_deref() == Some(benefit_id.as_str())
        })
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound(Resource::EmployeeBenefits.label()))
}

async fn test_webhook(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ServerError> {
    let store = state.store.read().await;
    if store.collection(Resource::Webhooks).get(&id).is_none() {
        return Err(ServerError::NotFound(Resource::Webhooks.label()));
    }
    Ok(Json(json!({ "status": "test_sent", "timestamp": timestamp(Utc::now()) })))
}

async fn bulk_employee_import(
    State(state): State<AppState>,
    Json(job): Json<Record>,
) -> (StatusCode, Json<Record>) {
    let created = state
        .store
        .write()
        .await
        .create(Resource::BulkImportJobs, job, Utc::now());
    (StatusCode::CREATED, Json(created))
}

async fn org_hierarchy(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let company_id = query
        .get("company_id")
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .unwrap_or("default");
    Json(json!({
        "company_id": company_id,
        "structure": [
            { "id": "1", "name": "CEO", "level": 0, "parent_id": null },
            { "id": "2", "name": "VP Engineering", "level": 1, "parent_id": "1" },
            { "id": "3", "name": "VP Sales", "level": 1, "parent_id": "1" },
        ],
    }))
}
