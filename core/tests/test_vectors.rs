//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use ukg_core::{
    AccessToken, ApiError, Approval, HttpMethod, HttpRequest, HttpResponse, Page, Record,
    Resource, UkgClient,
};

const BASE_URL: &str = "http://localhost:8080";
const TOKEN: &str = "tok-123";

fn client() -> UkgClient {
    UkgClient::new(BASE_URL).with_token(TOKEN)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn arg<'a>(case: &'a Value, key: &str) -> Option<&'a str> {
    case["args"][key].as_str()
}

fn assert_bearer_only(req: &HttpRequest, name: &str) {
    assert_eq!(
        req.headers,
        vec![("authorization".to_string(), format!("Bearer {TOKEN}"))],
        "{name}: headers"
    );
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

#[test]
fn token_test_vectors() {
    let c = UkgClient::new(BASE_URL);
    for case in load(include_str!("../../test-vectors/token.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let credentials = ukg_core::Credentials {
            app_id: input["app_id"].as_str().unwrap().to_string(),
            app_secret: input["app_secret"].as_str().unwrap().to_string(),
            client_id: input["client_id"].as_str().unwrap().to_string(),
        };
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_token_request(&credentials);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(req.body.as_deref(), expected_req["body"].as_str(), "{name}: body");

        // Verify parse
        let token = c.parse_token_response(simulated(&case)).unwrap();
        let expected: AccessToken = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(token, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();

        // Verify build
        let req = match operation {
            "get_timesheets" => c.build_get_timesheets(
                arg(&case, "employee_id"),
                arg(&case, "start_date"),
                arg(&case, "end_date"),
            ),
            "get_time_off_requests" => c.build_get_time_off_requests(arg(&case, "employee_id")),
            "get_pay_stubs" => c.build_get_pay_stubs(arg(&case, "employee_id")),
            "get_accrual_balances" => c.build_get_accrual_balances(
                arg(&case, "employee_id").unwrap(),
                arg(&case, "start_date").unwrap(),
                arg(&case, "end_date").unwrap(),
            ),
            "get_employee_benefits" => c.build_get_employee_benefits(arg(&case, "employee_id").unwrap()),
            other => panic!("unknown operation: {other}"),
        };
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
        assert_bearer_only(&req, name);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let page: Page = c.parse_page(simulated(&case)).unwrap();
        let data: Vec<Value> = page.data.into_iter().map(Value::Object).collect();
        assert_eq!(Value::Array(data), case["expected_data"], "{name}: parsed data");
        assert!(!page.pagination.has_more, "{name}: has_more");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let resource = match case["resource"].as_str().unwrap() {
            "timesheets" => Resource::Timesheets,
            "time_off_requests" => Resource::TimeOffRequests,
            "bulk_import_jobs" => Resource::BulkImportJobs,
            other => panic!("unknown resource: {other}"),
        };
        let input: Record = serde_json::from_value(case["input"].clone()).unwrap();

        // Verify build
        let req = c.build_create(resource, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Post, "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
        assert_eq!(req.header("authorization"), Some("Bearer tok-123"), "{name}: auth");
        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, case["input"], "{name}: body");

        // Verify parse
        let created: Record = c.parse_created(simulated(&case)).unwrap();
        assert_eq!(Value::Object(created), case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Approve / reject
// ---------------------------------------------------------------------------

#[test]
fn approve_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/approve.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["id"].as_str().unwrap();
        let approval: Approval = serde_json::from_value(case["input"].clone()).unwrap();

        // Verify build
        let req = match case["action"].as_str().unwrap() {
            "approve" => c.build_approve_time_off_request(id, &approval).unwrap(),
            "reject" => c.build_reject_time_off_request(id, &approval).unwrap(),
            other => panic!("unknown action: {other}"),
        };
        assert_eq!(req.method, HttpMethod::Post, "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, case["expected_body"], "{name}: body");

        // Verify parse
        let record: Record = c.parse_record(simulated(&case)).unwrap();
        assert_eq!(record["status"], case["expected_status"], "{name}: status");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/errors.json")) {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = case["body"].as_str().unwrap();

        let err = c.parse_record::<Record>(HttpResponse::new(status, body)).unwrap_err();
        match case["expected_error"].as_str().unwrap() {
            "unauthorized" => assert!(matches!(err, ApiError::Unauthorized(_)), "{name}: {err:?}"),
            "not_found" => assert!(matches!(err, ApiError::NotFound), "{name}: {err:?}"),
            "http_error" => match err {
                ApiError::HttpError { status: got, body: ref got_body } => {
                    assert_eq!(got, status, "{name}: status");
                    assert_eq!(got_body, body, "{name}: body");
                }
                other => panic!("{name}: expected HttpError, got {other:?}"),
            },
            "deserialization" => {
                assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: {err:?}")
            }
            other => panic!("unknown expected_error: {other}"),
        }
    }
}
