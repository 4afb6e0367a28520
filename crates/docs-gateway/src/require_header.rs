//! Header gate for routes that need a Dropbox access token.
//!
//! Requests without the header are answered here, before any handler (and
//! therefore any Dropbox call) runs. On success the token is stored in the
//! request extensions as [`AccessToken`].

use axum::{
    extract::{Request, State},
    http::{header::InvalidHeaderName, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;

pub const NO_TOKEN_ERROR: &str = "Your access token to Dropbox has expired or does not exist";

/// The caller's Dropbox access token, as taken from the gate header.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Which header to require, and how to answer when it is missing.
#[derive(Debug, Clone)]
pub struct RequireHeader {
    name: HeaderName,
    message: String,
    status: StatusCode,
}

impl RequireHeader {
    pub fn new(name: &str, message: impl Into<String>) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            name: HeaderName::from_bytes(name.as_bytes())?,
            message: message.into(),
            status: StatusCode::UNAUTHORIZED,
        })
    }

    /// Answer missing headers with `status` instead of 401.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    fn extract<'a>(&self, request: &'a Request) -> Option<&'a str> {
        request
            .headers()
            .get(&self.name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn require_header(
    State(gate): State<RequireHeader>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match gate.extract(&request) {
        Some(token) => AccessToken(token.to_string()),
        None => {
            tracing::debug!(
                "Rejected {} {}: no {} header",
                request.method(),
                request.uri().path(),
                gate.name
            );
            return (gate.status, Json(ErrorBody::new(gate.message.clone()))).into_response();
        }
    };

    request.extensions_mut().insert(token);
    next.run(request).await
}
