//! OAuth 2 authorization-code exchange against the Dropbox token endpoint.

use serde::Serialize;

use crate::client::{decode, Endpoints};
use crate::error::Result;
use crate::types::TokenResponse;

/// Registered Dropbox app credentials.
#[derive(Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthApp")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Token request (form-encoded)
#[derive(Debug, Serialize)]
struct CodeExchange<'a> {
    code: &'a str,
    grant_type: &'static str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl OAuthApp {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `redirect_uri` must be the one used to obtain the code.
    pub async fn exchange_code(
        &self,
        http: &reqwest::Client,
        endpoints: &Endpoints,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let form = CodeExchange {
            code,
            grant_type: "authorization_code",
            redirect_uri,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };

        let response = http.post(endpoints.token_url()).form(&form).send().await?;
        let token: TokenResponse = decode(response).await?;

        tracing::info!(
            "Exchanged authorization code for account {}",
            token.account_id.as_deref().unwrap_or("<unknown>")
        );
        Ok(token)
    }
}
