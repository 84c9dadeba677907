//! Stateless request builder and response parser for the UKG client API.
//!
//! # Design
//! `UkgClient` holds the base URL and, once authenticated, the bearer
//! token. Every operation is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`; the
//! caller (or `Session`) performs the round-trip in between.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AccessToken, Approval, Credentials, ListQuery, Page, Record, Resource};

/// Prefix shared by every UKG client route.
pub const API_PREFIX: &str = "/api/v2/client";

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Synchronous, I/O-free client for the UKG client API.
#[derive(Debug, Clone)]
pub struct UkgClient {
    base_url: String,
    token: Option<String>,
}

impl UkgClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach the bearer token used by every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -- authentication ----------------------------------------------------

    /// Client-credentials exchange against the token endpoint.
    pub fn build_token_request(&self, credentials: &Credentials) -> HttpRequest {
        let basic = STANDARD.encode(format!("{}:{}", credentials.app_id, credentials.app_secret));
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("scope", "client")
            .append_pair("client_id", &credentials.client_id)
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            path: self.url("tokens", &[]),
            headers: vec![
                ("authorization".to_string(), format!("Basic {basic}")),
                ("content-type".to_string(), FORM.to_string()),
            ],
            body: Some(body),
        }
    }

    pub fn parse_token_response(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    // -- generic collection operations -------------------------------------

    pub fn build_list(&self, resource: Resource, query: &ListQuery) -> HttpRequest {
        self.request(HttpMethod::Get, resource.path(), &query.pairs())
    }

    pub fn build_get(&self, resource: Resource, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{}/{id}", resource.path()), &[])
    }

    pub fn build_create(&self, resource: Resource, record: &Record) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, resource.create_path(), record)
    }

    pub fn build_update(
        &self,
        resource: Resource,
        id: &str,
        patch: &Record,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("{}/{id}", resource.path()), patch)
    }

    pub fn build_delete(&self, resource: Resource, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("{}/{id}", resource.path()), &[])
    }

    // -- named endpoints ---------------------------------------------------

    pub fn build_health_check(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "health", &[])
    }

    pub fn build_list_companies(&self) -> HttpRequest {
        self.build_list(Resource::Companies, &ListQuery::default())
    }

    pub fn build_create_timesheet(&self, timesheet: &Record) -> Result<HttpRequest, ApiError> {
        self.build_create(Resource::Timesheets, timesheet)
    }

    pub fn build_get_timesheets(
        &self,
        employee_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> HttpRequest {
        let query = ListQuery {
            employee_id: employee_id.map(str::to_string),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
            ..ListQuery::default()
        };
        self.build_list(Resource::Timesheets, &query)
    }

    pub fn build_create_time_off_request(&self, request: &Record) -> Result<HttpRequest, ApiError> {
        self.build_create(Resource::TimeOffRequests, request)
    }

    pub fn build_get_time_off_request(&self, id: &str) -> HttpRequest {
        self.build_get(Resource::TimeOffRequests, id)
    }

    pub fn build_get_time_off_requests(&self, employee_id: Option<&str>) -> HttpRequest {
        self.build_list(Resource::TimeOffRequests, &employee_filter(employee_id))
    }

    pub fn build_approve_time_off_request(
        &self,
        id: &str,
        approval: &Approval,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/{id}/approve", Resource::TimeOffRequests.path());
        self.json_request(HttpMethod::Post, &path, approval)
    }

    pub fn build_reject_time_off_request(
        &self,
        id: &str,
        approval: &Approval,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/{id}/reject", Resource::TimeOffRequests.path());
        self.json_request(HttpMethod::Post, &path, approval)
    }

    pub fn build_get_payroll_runs(&self) -> HttpRequest {
        self.build_list(Resource::PayrollRuns, &ListQuery::default())
    }

    pub fn build_get_pay_stubs(&self, employee_id: Option<&str>) -> HttpRequest {
        self.build_list(Resource::PayStubs, &employee_filter(employee_id))
    }

    pub fn build_get_pto_plans(&self, employee_id: &str) -> HttpRequest {
        self.build_list(Resource::PtoPlans, &ListQuery::for_employee(employee_id))
    }

    pub fn build_get_accrual_balances(
        &self,
        employee_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> HttpRequest {
        let query = ListQuery::for_employee(employee_id).between(start_date, end_date);
        self.build_list(Resource::AccrualBalances, &query)
    }

    pub fn build_get_employee_benefits(&self, employee_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("employees/{employee_id}/benefits"), &[])
    }

    pub fn build_get_employee_benefit(&self, employee_id: &str, benefit_id: &str) -> HttpRequest {
        let path = format!("employees/{employee_id}/benefits/{benefit_id}");
        self.request(HttpMethod::Get, &path, &[])
    }

    pub fn build_test_webhook(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("webhooks/{id}/test"), &[])
    }

    pub fn build_get_org_hierarchy(&self, company_id: Option<&str>) -> HttpRequest {
        let query: Vec<(&str, &str)> = company_id
            .filter(|id| !id.is_empty())
            .map(|id| ("company_id", id))
            .into_iter()
            .collect();
        self.request(HttpMethod::Get, "organization/hierarchy", &query)
    }

    // -- parsing -----------------------------------------------------------

    /// Parse a list envelope.
    pub fn parse_page<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Page<T>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    /// Parse a single object returned with 200 (get, update, approve, ...).
    pub fn parse_record<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    /// Parse a newly created object returned with 201.
    pub fn parse_created<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_deleted(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // -- helpers -----------------------------------------------------------

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{API_PREFIX}/{path}", self.base_url);
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().copied())
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        match &self.token {
            Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }

    fn request(&self, method: HttpMethod, path: &str, query: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(path, query),
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut headers = self.auth_headers();
        headers.push(("content-type".to_string(), JSON.to_string()));
        Ok(HttpRequest {
            method,
            path: self.url(path, &[]),
            headers,
            body: Some(body),
        })
    }
}

fn employee_filter(employee_id: Option<&str>) -> ListQuery {
    ListQuery {
        employee_id: employee_id.map(str::to_string),
        ..ListQuery::default()
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        401 => Err(ApiError::Unauthorized(response.body.clone())),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
