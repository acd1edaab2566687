use super::{validate_key, ArtifactLocator, ArtifactStore, StorageError, UrlPolicy};
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Stores artifacts as files under a root directory; the service serves them back
/// under `base_url`.
#[derive(Debug, Clone)]
pub struct FilesystemArtifactStore {
    root: PathBuf,
    base_url: String,
    policy: UrlPolicy,
}

impl FilesystemArtifactStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>, policy: UrlPolicy) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> &UrlPolicy {
        &self.policy
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    pub fn content_type_for(key: &str) -> mime::Mime {
        mime_guess::from_path(key).first_or(mime::APPLICATION_OCTET_STREAM)
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::read(path).await?)
    }
}

#[async_trait]
impl ArtifactStore for FilesystemArtifactStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ArtifactLocator, StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        write_or_discard(&path, file, &bytes).await?;

        debug!(key, content_type, size = bytes.len(), "artifact written");
        Ok(ArtifactLocator::new(key))
    }

    async fn resolve(&self, locator: &ArtifactLocator) -> Result<String, StorageError> {
        validate_key(locator.as_str())?;
        self.policy
            .apply(&self.base_url, locator.as_str(), Utc::now())
    }
}

/// Write a freshly created artifact; a failed write removes the partial file so the key
/// stays free.
async fn write_or_discard<W>(
    path: &Path,
    mut writer: W,
    bytes: &[u8],
) -> Result<(), StorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(writer);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial artifact");
        }
        return Err(err.into());
    }
    Ok(())
}
