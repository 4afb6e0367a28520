//! Configuration loading and management

use std::path::Path;

use anyhow::{Context, Result};
use dropbox::client::{DEFAULT_API_URL, DEFAULT_CONTENT_URL};
use dropbox::{Endpoints, OAuthApp};
use serde::{Deserialize, Serialize};

/// Main configuration for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dropbox app and API settings
    #[serde(default)]
    pub dropbox: DropboxConfig,

    /// Upload limits
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Certificate signing
    #[serde(default)]
    pub signing: SigningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropboxConfig {
    /// Dropbox app key
    #[serde(default)]
    pub client_id: String,

    /// Dropbox app secret
    #[serde(default)]
    pub client_secret: String,

    /// Request header carrying the caller's Dropbox access token
    #[serde(default = "default_auth_token_name")]
    pub auth_token_name: String,

    /// Redirect URI used when `/auth` requests don't supply one
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// RPC host base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Content host base URL
    #[serde(default = "default_content_url")]
    pub content_url: String,
}

impl Default for DropboxConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_token_name: default_auth_token_name(),
            redirect_uri: None,
            api_url: default_api_url(),
            content_url: default_content_url(),
        }
    }
}

impl DropboxConfig {
    pub fn oauth_app(&self) -> OAuthApp {
        OAuthApp::new(&self.client_id, &self.client_secret)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api: self.api_url.clone(),
            content: self.content_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted request body in bytes (default: 150 MiB, the
    /// Dropbox single-request upload cap)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Certificate signing key (hex-encoded)
    /// If not set, a random key is generated at startup (certificates won't verify across restarts)
    pub signing_key: Option<String>,
}

fn default_auth_token_name() -> String {
    "x-dropbox-token".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_content_url() -> String {
    DEFAULT_CONTENT_URL.to_string()
}

fn default_max_upload_bytes() -> usize {
    150 * 1024 * 1024
}

impl Config {
    /// Load configuration from the config directory
    pub fn load(config_path: &str) -> Result<Self> {
        let config_file = Path::new(config_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_file
            );
            let config = Config::default();

            // Create config directory if it doesn't exist
            std::fs::create_dir_all(config_path)
                .with_context(|| format!("Failed to create config directory: {}", config_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }

    /// Apply app credentials given on the command line or in the environment.
    pub fn with_credentials(mut self, client_id: Option<String>, client_secret: Option<String>) -> Self {
        if let Some(id) = client_id {
            self.dropbox.client_id = id;
        }
        if let Some(secret) = client_secret {
            self.dropbox.client_secret = secret;
        }
        self
    }

    /// Decode the configured signing key, or generate a random one.
    pub fn signing_key(&self) -> Result<Vec<u8>> {
        match &self.signing.signing_key {
            Some(key) => hex::decode(key).with_context(|| "signing_key must be hex-encoded"),
            None => {
                tracing::warn!("No signing_key configured, generating an ephemeral one");
                let key: [u8; 32] = rand::random();
                Ok(key.to_vec())
            }
        }
    }
}
