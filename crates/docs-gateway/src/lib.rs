//! docs-gateway library: application state and router.
//!
//! The binary in `main.rs` only parses the CLI, sets up tracing and serves
//! the router built here; integration tests drive the same router.

pub mod certificate;
pub mod config;
pub mod controller;
pub mod error;
pub mod require_header;
pub mod routes;

use anyhow::{Context, Result};
use dropbox::DropboxService;

use crate::certificate::CertificateSigner;
use crate::config::Config;
use crate::require_header::{RequireHeader, NO_TOKEN_ERROR};

pub use routes::router;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub dropbox: DropboxService,
    pub signer: CertificateSigner,
    /// Gate requiring the Dropbox token header
    pub token_gate: RequireHeader,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let dropbox = DropboxService::new(config.dropbox.oauth_app(), config.dropbox.endpoints())
            .context("Failed to build Dropbox HTTP client")?;
        let signer = CertificateSigner::new(config.signing_key()?);
        let token_gate = RequireHeader::new(&config.dropbox.auth_token_name, NO_TOKEN_ERROR)
            .with_context(|| {
                format!("Invalid auth_token_name: {:?}", config.dropbox.auth_token_name)
            })?;

        if config.dropbox.client_id.is_empty() || config.dropbox.client_secret.is_empty() {
            tracing::warn!("Dropbox client_id/client_secret not configured, /auth will fail");
        }

        Ok(Self {
            config,
            dropbox,
            signer,
            token_gate,
        })
    }
}
