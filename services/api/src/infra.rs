use metrics_exporter_prometheus::PrometheusHandle;
use readiness_check::config::{ArtifactBackendConfig, StorageConfig};
use readiness_check::theme::ThemeSettings;
use readiness_check::workflows::readiness::results::{ResultRepository, ResultService};
use readiness_check::workflows::readiness::storage::{
    ArtifactStore, FilesystemArtifactStore, HttpBlobStore, HttpClient,
};
use readiness_check::workflows::readiness::ReadinessCatalog;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared state of the scoring, interactive report, catalog, and theme endpoints.
pub(crate) struct ApiState<R> {
    pub(crate) catalog: Arc<ReadinessCatalog>,
    pub(crate) results: Arc<ResultService<R>>,
    pub(crate) theme: Arc<ThemeSettings>,
}

impl<R> Clone for ApiState<R> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            results: Arc::clone(&self.results),
            theme: Arc::clone(&self.theme),
        }
    }
}

impl<R> ApiState<R>
where
    R: ResultRepository + 'static,
{
    pub(crate) fn new(
        catalog: Arc<ReadinessCatalog>,
        results: Arc<ResultService<R>>,
        theme: Arc<ThemeSettings>,
    ) -> Self {
        Self {
            catalog,
            results,
            theme,
        }
    }
}

/// Configured artifact store plus, for the filesystem backend, the handle the service
/// uses to serve stored files itself.
pub(crate) struct ArtifactBackend {
    pub(crate) store: Arc<dyn ArtifactStore>,
    pub(crate) served: Option<Arc<FilesystemArtifactStore>>,
}

pub(crate) fn artifact_backend(config: &StorageConfig) -> ArtifactBackend {
    match &config.artifacts {
        ArtifactBackendConfig::Filesystem { root } => {
            let store = Arc::new(FilesystemArtifactStore::new(
                root.clone(),
                config.artifact_base_url(),
                config.url_policy.clone(),
            ));
            ArtifactBackend {
                store: store.clone(),
                served: Some(store),
            }
        }
        ArtifactBackendConfig::Http {
            endpoint,
            public_url,
            token,
        } => ArtifactBackend {
            store: Arc::new(HttpBlobStore::new(
                HttpClient::new(),
                endpoint.clone(),
                token.clone(),
                public_url.clone(),
                config.url_policy.clone(),
            )),
            served: None,
        },
    }
}
