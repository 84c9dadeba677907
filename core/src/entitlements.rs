//! Request builder and response parser for the union entitlements service.
//!
//! The service is unauthenticated and answers with bare JSON arrays or
//! objects rather than the UKG list envelope.

use serde::de::DeserializeOwned;

use crate::client::{check_status, decode};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct EntitlementsClient {
    base_url: String,
}

impl EntitlementsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_unions(&self) -> HttpRequest {
        self.get("unions")
    }

    pub fn build_union_members(&self, union_id: &str) -> HttpRequest {
        self.get(&format!("unions/{union_id}/members"))
    }

    pub fn build_employee_entitlements(&self, employee_id: &str) -> HttpRequest {
        self.get(&format!("employees/{employee_id}/entitlements"))
    }

    pub fn build_member_entitlements(&self, member_id: &str) -> HttpRequest {
        self.get(&format!("members/{member_id}/entitlements"))
    }

    /// Violations recorded for an employee, optionally bounded by date.
    pub fn build_employee_violations(
        &self,
        employee_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> HttpRequest {
        let mut request = self.get(&format!("employees/{employee_id}/violations"));
        let pairs: Vec<(&str, &str)> = [("start_date", start_date), ("end_date", end_date)]
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect();
        if !pairs.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            request.path.push('?');
            request.path.push_str(&query);
        }
        request
    }

    pub fn build_compliance_parameters(&self, union_id: &str) -> HttpRequest {
        self.get(&format!("unions/{union_id}/compliance"))
    }

    pub fn build_health(&self) -> HttpRequest {
        self.get("health")
    }

    /// Parse a bare JSON array.
    pub fn parse_list<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Vec<T>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    /// Parse a single JSON object.
    pub fn parse_object<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }
}
