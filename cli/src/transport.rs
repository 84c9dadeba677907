//! Blocking `Transport` backed by a shared `ureq` agent.

use std::time::Duration;

use ukg_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use ureq::Agent;

pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Non-2xx statuses come back as responses, not errors, so the core
    /// client can interpret them.
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

fn transport_error(err: ureq::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = if method == HttpMethod::Get {
                    self.agent.get(&path)
                } else {
                    self.agent.delete(&path)
                };
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if method == HttpMethod::Post {
                    self.agent.post(&path)
                } else {
                    self.agent.put(&path)
                };
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
