//! Synchronous client core for the UKG workforce API and the union
//! entitlements service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A host-supplied
//! `Transport` executes the round-trip; `Session` ties the two together
//! after the bearer-token exchange.
//!
//! # Design
//! - `UkgClient` and `EntitlementsClient` are stateless apart from the
//!   base URL and token.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every request can be asserted on directly.
//! - UKG records stay untyped JSON; only what the leave workflow reads is
//!   typed.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod entitlements;
pub mod error;
pub mod http;
pub mod leave;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{UkgClient, API_PREFIX};
pub use entitlements::EntitlementsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use leave::{evaluate, CheckFailure, LeaveDecision, LeaveFacts, LeaveOutcome, LeaveRequest, LeaveWorkflow, WorkflowError};
pub use session::Session;
pub use transport::Transport;
pub use types::{
    AccessToken, AccrualBalance, Approval, ComplianceParameters, Credentials, Entitlement,
    ListQuery, Page, Pagination, PtoPlan, Record, Resource, Union, UnionMember, Violation,
};
