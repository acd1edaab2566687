//! Write-once artifact storage behind a single interface.
//!
//! A store turns bytes into an opaque [`ArtifactLocator`]; locators are resolved to
//! retrievable URLs on demand so that signed URLs always carry a fresh expiry.

mod filesystem;
mod http;

pub use filesystem::FilesystemArtifactStore;
pub use http::HttpBlobStore;
pub use reqwest::Client as HttpClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::time::Duration;

/// Opaque handle to a stored artifact, persisted alongside result metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactLocator(String);

impl ArtifactLocator {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("artifact `{0}` already exists")]
    AlreadyExists(String),
    #[error("invalid artifact key `{0}`")]
    InvalidKey(String),
    #[error("artifact store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("artifact store rejected `{key}` with status {status}")]
    Rejected { key: String, status: u16 },
    #[error("URL signing key rejected: {0}")]
    Signing(String),
}

type HmacSha256 = Hmac<Sha256>;

#[async_trait]
pub trait ArtifactStore: Send + Sync + fmt::Debug {
    /// Store `bytes` under `key`; fails with [`StorageError::AlreadyExists`] rather than
    /// overwriting an existing artifact.
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ArtifactLocator, StorageError>;

    async fn resolve(&self, locator: &ArtifactLocator) -> Result<String, StorageError>;
}

/// How locators become URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UrlPolicy {
    #[default]
    Public,
    Signed { secret: String, ttl: Duration },
}

impl UrlPolicy {
    pub fn apply(
        &self,
        base_url: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let url = join_url(base_url, key);
        match self {
            Self::Public => Ok(url),
            Self::Signed { secret, ttl } => {
                let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                let expires = now.timestamp().saturating_add(ttl);
                let signature = sign(secret, key, expires)?;
                Ok(format!("{url}?expires={expires}&signature={signature}"))
            }
        }
    }
}

fn keyed_mac(secret: &str, key: &str, expires: i64) -> Result<HmacSha256, StorageError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| StorageError::Signing(err.to_string()))?;
    mac.update(key.as_bytes());
    mac.update(b":");
    mac.update(expires.to_string().as_bytes());
    Ok(mac)
}

/// Hex HMAC-SHA256 of `key:expires` under `secret`.
pub fn sign(secret: &str, key: &str, expires: i64) -> Result<String, StorageError> {
    Ok(hex::encode(keyed_mac(secret, key, expires)?.finalize().into_bytes()))
}

/// Constant-time check of a signature produced by [`sign`] that has not yet expired.
pub fn verify_signature(
    secret: &str,
    key: &str,
    expires: i64,
    signature: &str,
    now: DateTime<Utc>,
) -> bool {
    if expires < now.timestamp() {
        return false;
    }
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    keyed_mac(secret, key, expires)
        .map(|mac| mac.verify_slice(&expected).is_ok())
        .unwrap_or(false)
}

/// Keys are relative paths of `[A-Za-z0-9._-]` segments; empty, `.` and `..` segments are
/// rejected.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn join_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn public_policy_joins_base_and_key() {
        let url = UrlPolicy::Public
            .apply("https://cdn.example.com/", "ai-readiness/abc123.pdf", now())
            .expect("public url");
        assert_eq!(url, "https://cdn.example.com/ai-readiness/abc123.pdf");
    }

    #[test]
    fn signed_policy_appends_verifiable_signature() {
        let policy = UrlPolicy::Signed {
            secret: "s3cret".into(),
            ttl: Duration::from_secs(60),
        };
        let url = policy
            .apply("http://localhost:3000/artifacts", "ai-readiness/abc123.pdf", now())
            .expect("signed url");
        let expires = now().timestamp() + 60;
        let signature = sign("s3cret", "ai-readiness/abc123.pdf", expires).expect("signature");
        assert_eq!(
            url,
            format!(
                "http://localhost:3000/artifacts/ai-readiness/abc123.pdf?expires={expires}&signature={signature}"
            )
        );

        assert!(verify_signature("s3cret", "ai-readiness/abc123.pdf", expires, &signature, now()));
        assert!(!verify_signature("other", "ai-readiness/abc123.pdf", expires, &signature, now()));
        assert!(!verify_signature("s3cret", "ai-readiness/zzz999.pdf", expires, &signature, now()));
    }

    #[test]
    fn expired_signatures_are_refused() {
        let expires = now().timestamp() - 1;
        let signature = sign("s3cret", "k.pdf", expires).expect("signature");
        assert!(!verify_signature("s3cret", "k.pdf", expires, &signature, now()));
    }

    #[test]
    fn signatures_are_hmac_sha256_and_reject_tampering() {
        // RFC 4231 test case 2.
        let mut mac = HmacSha256::new_from_slice(b"Jefe").expect("key");
        mac.update(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );

        let expires = now().timestamp() + 60;
        let signature = sign("s3cret", "k.pdf", expires).expect("signature");
        assert_eq!(signature.len(), 64);
        assert!(verify_signature("s3cret", "k.pdf", expires, &signature.to_uppercase(), now()));
        assert!(!verify_signature("s3cret", "k.pdf", expires + 1, &signature, now()));
        assert!(!verify_signature("s3cret", "k.pdf", expires, &signature[..62], now()));
        assert!(!verify_signature("s3cret", "k.pdf", expires, "not-hex", now()));
    }

    #[test]
    fn key_validation_blocks_traversal() {
        assert!(validate_key("ai-readiness/abc123.pdf").is_ok());
        for key in ["", "/etc/passwd", "../x.pdf", "a//b", "a/./b", "a b.pdf", "a\\b"] {
            assert!(matches!(validate_key(key), Err(StorageError::InvalidKey(_))), "{key}");
        }
    }
}
