use super::{validate_key, ArtifactLocator, ArtifactStore, StorageError, UrlPolicy};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, IF_NONE_MATCH};
use reqwest::StatusCode;
use tracing::debug;

/// Remote blob store reached over plain HTTP `PUT`.
///
/// Uploads carry `If-None-Match: *` so an existing blob answers `412` instead of being
/// replaced.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    public_base_url: String,
    policy: UrlPolicy,
}

impl HttpBlobStore {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: Option<String>,
        public_base_url: impl Into<String>,
        policy: UrlPolicy,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token,
            public_base_url: public_base_url.into(),
            policy,
        }
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl ArtifactStore for HttpBlobStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ArtifactLocator, StorageError> {
        validate_key(key)?;

        let mut request = self
            .client
            .put(self.upload_url(key))
            .header(CONTENT_TYPE, content_type)
            .header(IF_NONE_MATCH, "*")
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => {
                debug!(key, status = status.as_u16(), "blob uploaded");
                Ok(ArtifactLocator::new(key))
            }
            StatusCode::PRECONDITION_FAILED | StatusCode::CONFLICT => {
                Err(StorageError::AlreadyExists(key.to_string()))
            }
            status => Err(StorageError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn resolve(&self, locator: &ArtifactLocator) -> Result<String, StorageError> {
        validate_key(locator.as_str())?;
        self.policy
            .apply(&self.public_base_url, locator.as_str(), Utc::now())
    }
}
