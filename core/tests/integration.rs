//! End-to-end tests against the live mock servers.
//!
//! # Design
//! Starts the UKG API and the entitlements service on random ports, then
//! drives `Session` and `LeaveWorkflow` over real HTTP using ureq. Checks
//! that request building and response parsing agree with the actual
//! server.

use std::net::SocketAddr;

use chrono::NaiveDate;
use serde_json::{json, Value};
use ukg_core::{
    ApiError, Approval, CheckFailure, Credentials, EntitlementsClient, HttpMethod, HttpRequest,
    HttpResponse, LeaveRequest, LeaveWorkflow, ListQuery, Record, Resource, Session, Transport,
};
use ukg_mock_server::{seed, AppState, Store};

/// Executes requests with ureq, returning 4xx/5xx as data.
struct Ureq(ureq::Agent);

impl Ureq {
    fn new() -> Self {
        Ureq(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }
}

impl Transport for Ureq {
    fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match req.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = if req.method == HttpMethod::Get {
                    self.0.get(&req.path)
                } else {
                    self.0.delete(&req.path)
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if req.method == HttpMethod::Post {
                    self.0.post(&req.path)
                } else {
                    self.0.put(&req.path)
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse::new(status, body))
    }
}

struct Servers {
    api: SocketAddr,
    entitlements: SocketAddr,
}

impl Servers {
    fn api_url(&self) -> String {
        format!("http://{}", self.api)
    }

    fn entitlements_url(&self) -> String {
        format!("http://{}", self.entitlements)
    }
}

/// Bind both services on random ports and serve them from a background thread.
fn start(seeded: bool) -> Servers {
    let api = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let entitlements = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let servers = Servers {
        api: api.local_addr().unwrap(),
        entitlements: entitlements.local_addr().unwrap(),
    };
    api.set_nonblocking(true).unwrap();
    entitlements.set_nonblocking(true).unwrap();

    let mut store = Store::default();
    if seeded {
        seed::seed(&mut store);
    }
    let state = AppState::new(store, chrono::Duration::hours(1));

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let api = tokio::net::TcpListener::from_std(api).unwrap();
            let entitlements = tokio::net::TcpListener::from_std(entitlements).unwrap();
            tokio::try_join!(
                ukg_mock_server::run(api, state),
                ukg_mock_server::run_entitlements(entitlements)
            )
        })
        .unwrap();
    });
    servers
}

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn connect(servers: &Servers) -> Session<Ureq> {
    Session::connect(Ureq::new(), &servers.api_url(), &Credentials::default()).unwrap()
}

#[test]
fn rejects_bad_token() {
    let servers = start(false);
    let session = Session::with_client(
        Ureq::new(),
        ukg_core::UkgClient::new(&servers.api_url()).with_token("not-a-token"),
    );
    let err = session.health_check().unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "got {err:?}");
}

#[test]
fn crud_lifecycle() {
    let servers = start(false);
    let session = connect(&servers);

    // Step 1: health and empty list.
    assert_eq!(session.health_check().unwrap()["status"], "healthy");
    let employees = session.list(Resource::Employees, &ListQuery::default()).unwrap();
    assert!(employees.data.is_empty());
    assert!(!employees.pagination.has_more);

    // Step 2: create.
    let created = session
        .create(
            Resource::Employees,
            &record(json!({"first_name": "Ada", "last_name": "Lovelace", "employee_id": "EMP900"})),
        )
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created.contains_key("created_at"));

    // Step 3: filtered list sees it.
    let found = session
        .list(Resource::Employees, &ListQuery::for_employee("EMP900"))
        .unwrap();
    assert_eq!(found.data.len(), 1);

    // Step 4: partial update keeps other fields.
    let updated = session
        .update(Resource::Employees, &id, &record(json!({"last_name": "King"})))
        .unwrap();
    assert_eq!(updated["first_name"], "Ada");
    assert_eq!(updated["last_name"], "King");

    // Step 5: get reflects the update.
    assert_eq!(session.get(Resource::Employees, &id).unwrap()["last_name"], "King");

    // Step 6: delete, then the record is gone.
    session.delete(Resource::Employees, &id).unwrap();
    assert!(matches!(
        session.get(Resource::Employees, &id),
        Err(ApiError::NotFound)
    ));
    assert!(matches!(
        session.delete(Resource::Employees, &id),
        Err(ApiError::NotFound)
    ));
}

#[test]
fn time_off_round_trip() {
    let servers = start(false);
    let session = connect(&servers);

    let created = session
        .create_time_off_request(&record(json!({
            "employee_id": "123",
            "type": "vacation",
            "start_date": "2025-12-01",
            "end_date": "2025-12-05",
            "status": "approved",
        })))
        .unwrap();
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap();

    let approved = session
        .approve_time_off_request(
            id,
            &Approval {
                approved_by: Some("manager@testcompany.com".to_string()),
                notes: None,
            },
        )
        .unwrap();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], "manager@testcompany.com");

    let rejected = session
        .reject_time_off_request(id, &Approval::default())
        .unwrap();
    assert_eq!(rejected["status"], "rejected");

    let listed = session.get_time_off_requests(Some("123")).unwrap();
    assert_eq!(listed.data.len(), 1);
    assert!(session.get_time_off_requests(Some("999")).unwrap().data.is_empty());
}

#[test]
fn timesheets_filter_by_window() {
    let servers = start(false);
    let session = connect(&servers);
    for date in ["2025-11-27", "2025-11-28", "2025-11-29"] {
        session
            .create_timesheet(&record(json!({
                "employee_id": "123",
                "date": date,
                "start_time": "09:00",
                "end_time": "17:00",
            })))
            .unwrap();
    }
    let page = session
        .get_timesheets(Some("123"), Some("2025-11-28"), Some("2025-11-29"))
        .unwrap();
    let dates: Vec<&str> = page.data.iter().map(|r| r["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2025-11-28", "2025-11-29"]);
}

#[test]
fn webhooks_and_organization() {
    let servers = start(false);
    let session = connect(&servers);
    let hook = session
        .create(
            Resource::Webhooks,
            &record(json!({"url": "https://test.example.com/webhook", "events": ["employee.created"]})),
        )
        .unwrap();
    let tested = session.test_webhook(hook["id"].as_str().unwrap()).unwrap();
    assert_eq!(tested["status"], "test_sent");

    let tree = session.get_org_hierarchy(Some("acme")).unwrap();
    assert_eq!(tree["company_id"], "acme");
}

#[test]
fn seeded_reads() {
    let servers = start(true);
    let session = connect(&servers);
    assert_eq!(session.list_companies().unwrap().data.len(), 2);
    assert_eq!(session.get_pay_stubs(Some("EMP001")).unwrap().data.len(), 1);
    assert_eq!(session.get_payroll_runs().unwrap().data.len(), 2);
    assert_eq!(session.get_employee_benefits("EMP001").unwrap().data.len(), 1);
    let plans = session.get_pto_plans("EMP001").unwrap();
    assert_eq!(plans.data.len(), 2);
    let balances = session
        .get_accrual_balances("EMP001", "2024-03-04", "2024-03-08")
        .unwrap();
    assert!(balances.data.iter().any(|b| b.available_hours == 64.0));
}

fn pending_request(session: &Session<Ureq>, employee_id: &str) -> String {
    let page = session.get_time_off_requests(Some(employee_id)).unwrap();
    page.data[0]["id"].as_str().unwrap().to_string()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

#[test]
fn leave_workflow_approves_eligible_member() {
    let servers = start(true);
    let session = connect(&servers);
    let request_id = pending_request(&session, "EMP001");
    let workflow = LeaveWorkflow::new(
        &session,
        EntitlementsClient::new(&servers.entitlements_url()),
        "leave-bot",
    );
    let request = LeaveRequest {
        request_id: request_id.clone(),
        employee_id: "EMP001".to_string(),
        union_id: "U100".to_string(),
        leave_type: "vacation".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        hours: 40.0,
    };

    let outcome = workflow.run(&request, today()).unwrap();
    assert!(outcome.approved, "failures: {:?}", outcome.decision.failures);
    let record = outcome.record.unwrap();
    assert_eq!(record["status"], "approved");
    assert_eq!(record["approved_by"], "leave-bot");

    let stored = session.get_time_off_request(&request_id).unwrap();
    assert_eq!(stored["status"], "approved");
}

#[test]
fn leave_workflow_denies_member_with_open_violation() {
    let servers = start(true);
    let session = connect(&servers);
    let created = session
        .create_time_off_request(&record(json!({
            "employee_id": "EMP003",
            "type": "vacation",
            "start_date": "2024-03-04",
            "end_date": "2024-03-05",
        })))
        .unwrap();
    let request_id = created["id"].as_str().unwrap().to_string();
    let workflow = LeaveWorkflow::new(
        &session,
        EntitlementsClient::new(&servers.entitlements_url()),
        "leave-bot",
    );
    let request = LeaveRequest {
        request_id: request_id.clone(),
        employee_id: "EMP003".to_string(),
        union_id: "U100".to_string(),
        leave_type: "vacation".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        hours: 16.0,
    };

    let outcome = workflow.run(&request, today()).unwrap();
    assert!(!outcome.approved);
    assert!(outcome.record.is_none());
    assert_eq!(
        outcome.decision.failures,
        vec![CheckFailure::OpenViolations { count: 1 }]
    );

    // Denied requests are left untouched.
    let stored = session.get_time_off_request(&request_id).unwrap();
    assert_eq!(stored["status"], "pending");
}

#[test]
fn leave_workflow_surfaces_unknown_union() {
    let servers = start(true);
    let session = connect(&servers);
    let workflow = LeaveWorkflow::new(
        &session,
        EntitlementsClient::new(&servers.entitlements_url()),
        "leave-bot",
    );
    let request = LeaveRequest {
        request_id: "missing".to_string(),
        employee_id: "EMP001".to_string(),
        union_id: "U999".to_string(),
        leave_type: "vacation".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        hours: 8.0,
    };
    let err = workflow.decide(&request, today()).unwrap_err();
    assert!(matches!(
        err,
        ukg_core::WorkflowError::Step {
            step: "compliance parameters",
            source: ApiError::NotFound,
        }
    ));
}
