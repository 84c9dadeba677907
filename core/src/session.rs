//! An authenticated client bound to a transport.
//!
//! `Session` performs the token exchange once and then runs each operation
//! as build → send → parse. It adds no retries and no caching.

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::client::UkgClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    AccrualBalance, Approval, Credentials, ListQuery, Page, PtoPlan, Record, Resource,
};

pub struct Session<T> {
    transport: T,
    client: UkgClient,
}

impl<T: Transport> Session<T> {
    /// Exchange `credentials` for a bearer token.
    pub fn connect(transport: T, base_url: &str, credentials: &Credentials) -> Result<Self, ApiError> {
        let client = UkgClient::new(base_url);
        let response = transport.send(client.build_token_request(credentials))?;
        let token = client.parse_token_response(response)?;
        info!(
            base_url = client.base_url(),
            client_id = %credentials.client_id,
            expires_in = token.expires_in,
            "obtained access token"
        );
        Ok(Self {
            transport,
            client: client.with_token(token.access_token),
        })
    }

    /// Wrap a client that already carries a token.
    pub fn with_client(transport: T, client: UkgClient) -> Self {
        Self { transport, client }
    }

    pub fn client(&self) -> &UkgClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a prepared request over the session transport with request logging.
    /// Used for the entitlements service, which shares the transport but not the client.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    fn page<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<Page<R>, ApiError> {
        let response = self.send(request)?;
        self.client.parse_page(response)
    }

    fn record<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.send(request)?;
        self.client.parse_record(response)
    }

    fn created(&self, request: HttpRequest) -> Result<Record, ApiError> {
        let response = self.send(request)?;
        self.client.parse_created(response)
    }

    // -- generic -----------------------------------------------------------

    pub fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page, ApiError> {
        self.page(self.client.build_list(resource, query))
    }

    pub fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError> {
        self.record(self.client.build_get(resource, id))
    }

    pub fn create(&self, resource: Resource, record: &Record) -> Result<Record, ApiError> {
        self.created(self.client.build_create(resource, record)?)
    }

    pub fn update(&self, resource: Resource, id: &str, patch: &Record) -> Result<Record, ApiError> {
        self.record(self.client.build_update(resource, id, patch)?)
    }

    pub fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete(resource, id))?;
        self.client.parse_deleted(response)
    }

    // -- named -------------------------------------------------------------

    pub fn health_check(&self) -> Result<Record, ApiError> {
        self.record(self.client.build_health_check())
    }

    pub fn list_companies(&self) -> Result<Page, ApiError> {
        self.page(self.client.build_list_companies())
    }

    pub fn create_timesheet(&self, timesheet: &Record) -> Result<Record, ApiError> {
        self.created(self.client.build_create_timesheet(timesheet)?)
    }

    pub fn get_timesheets(
        &self,
        employee_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Page, ApiError> {
        self.page(self.client.build_get_timesheets(employee_id, start_date, end_date))
    }

    pub fn create_time_off_request(&self, request: &Record) -> Result<Record, ApiError> {
        self.created(self.client.build_create_time_off_request(request)?)
    }

    pub fn get_time_off_request(&self, id: &str) -> Result<Record, ApiError> {
        self.record(self.client.build_get_time_off_request(id))
    }

    pub fn get_time_off_requests(&self, employee_id: Option<&str>) -> Result<Page, ApiError> {
        self.page(self.client.build_get_time_off_requests(employee_id))
    }

    pub fn approve_time_off_request(&self, id: &str, approval: &Approval) -> Result<Record, ApiError> {
        self.record(self.client.build_approve_time_off_request(id, approval)?)
    }

    pub fn reject_time_off_request(&self, id: &str, approval: &Approval) -> Result<Record, ApiError> {
        self.record(self.client.build_reject_time_off_request(id, approval)?)
    }

    pub fn get_payroll_runs(&self) -> Result<Page, ApiError> {
        self.page(self.client.build_get_payroll_runs())
    }

    pub fn get_pay_stubs(&self, employee_id: Option<&str>) -> Result<Page, ApiError> {
        self.page(self.client.build_get_pay_stubs(employee_id))
    }

    pub fn get_pto_plans(&self, employee_id: &str) -> Result<Page<PtoPlan>, ApiError> {
        self.page(self.client.build_get_pto_plans(employee_id))
    }

    pub fn get_accrual_balances(
        &self,
        employee_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Page<AccrualBalance>, ApiError> {
        self.page(self.client.build_get_accrual_balances(employee_id, start_date, end_date))
    }

    pub fn get_employee_benefits(&self, employee_id: &str) -> Result<Page, ApiError> {
        self.page(self.client.build_get_employee_benefits(employee_id))
    }

    pub fn test_webhook(&self, id: &str) -> Result<Record, ApiError> {
        self.record(self.client.build_test_webhook(id))
    }

    pub fn get_org_hierarchy(&self, company_id: Option<&str>) -> Result<Record, ApiError> {
        self.record(self.client.build_get_org_hierarchy(company_id))
    }
}
