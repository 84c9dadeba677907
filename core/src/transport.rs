//! The seam where the host plugs in real I/O.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as data; only failures
/// that prevent a response from arriving map to `ApiError::Transport`.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}
