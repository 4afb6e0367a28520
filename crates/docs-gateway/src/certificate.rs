//! Document registrations and signed certificates.
//!
//! A registration fingerprints a Dropbox document; a certificate binds a
//! PDF fingerprint to an issue time with a keyed SHA-256 signature.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `contents`.
pub fn sha256_hex(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

/// A Dropbox document fingerprinted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub file_id: String,
    pub name: String,
    pub size: u64,
    pub sha256: String,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(file_id: &str, name: &str, contents: &[u8]) -> Self {
        Self {
            file_id: file_id.to_string(),
            name: name.to_string(),
            size: contents.len() as u64,
            sha256: sha256_hex(contents),
            registered_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub filename: String,
    pub size: u64,
    pub sha256: String,
    pub issued_at: DateTime<Utc>,
    pub signature: String,
}

/// Issues and verifies certificates with a secret key.
pub struct CertificateSigner {
    key: Vec<u8>,
}

impl CertificateSigner {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn sign(&self, filename: &str, contents: &[u8]) -> Certificate {
        self.sign_at(filename, contents, Utc::now())
    }

    pub fn sign_at(&self, filename: &str, contents: &[u8], issued_at: DateTime<Utc>) -> Certificate {
        let sha256 = sha256_hex(contents);
        let signature = self.signature(&sha256, &issued_at);
        Certificate {
            filename: filename.to_string(),
            size: contents.len() as u64,
            sha256,
            issued_at,
            signature,
        }
    }

    pub fn verify(&self, certificate: &Certificate) -> bool {
        self.signature(&certificate.sha256, &certificate.issued_at) == certificate.signature
    }

    // key \0 sha256 \0 issued_at (RFC 3339, millis)
    fn signature(&self, sha256: &str, issued_at: &DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.key);
        hasher.update([0u8]);
        hasher.update(sha256.as_bytes());
        hasher.update([0u8]);
        hasher.update(issued_at.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Whether `contents` looks like a PDF (`%PDF-` magic).
pub fn is_pdf(contents: &[u8]) -> bool {
    contents.starts_with(b"%PDF-")
}
