//! Per-request session context.
//!
//! Authentication happens outside this service. Handlers receive the
//! caller's bearer token, if any, and a request id as an explicit value.
//! Request ids come from a counter owned by the router's state.

use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Issues increasing request ids, starting at 1
#[derive(Debug, Default)]
pub struct RequestIds(AtomicU64);

impl RequestIds {
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Router state that owns a [`RequestIds`] counter
pub trait RequestIdSource {
    fn request_ids(&self) -> &RequestIds;
}

impl RequestIdSource for RequestIds {
    fn request_ids(&self) -> &RequestIds {
        self
    }
}

impl<T: RequestIdSource> RequestIdSource for Arc<T> {
    fn request_ids(&self) -> &RequestIds {
        (**self).request_ids()
    }
}

/// Context threaded through every handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub request_id: u64,
    token: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub fn new(request_id: u64, token: Option<String>) -> Self {
        Self { request_id, token }
    }

    /// Build a context from an `Authorization` header value
    #[must_use]
    pub fn from_authorization(request_id: u64, authorization: Option<&str>) -> Self {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ToString::to_string);
        Self::new(request_id, token)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: RequestIdSource + Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = state.request_ids().issue();
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        Ok(Self::from_authorization(request_id, authorization))
    }
}
