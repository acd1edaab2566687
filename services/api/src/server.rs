use crate::cli::ServeArgs;
use crate::infra::{artifact_backend, ApiState, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use readiness_check::config::AppConfig;
use readiness_check::error::AppError;
use readiness_check::telemetry;
use readiness_check::theme::{ColorScheme, ThemeSettings};
use readiness_check::workflows::readiness::results::{ResultService, SqliteResultRepository};
use readiness_check::workflows::readiness::{Branding, ReadinessCatalog, ReportRenderer};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(SqliteResultRepository::open(&config.storage.database_path).await?);
    let backend = artifact_backend(&config.storage);
    let branding = Branding::from_logo_path(config.branding.logo_path.as_deref());
    let catalog = Arc::new(ReadinessCatalog::standard());
    let results = Arc::new(ResultService::new(
        repository,
        backend.store,
        catalog.clone(),
        ReportRenderer::new(branding),
    ));
    // The server has no view of the client's OS scheme until one reports it.
    let theme = Arc::new(ThemeSettings::new(config.theme, ColorScheme::Light));

    let app = with_service_routes(ApiState::new(catalog, results, theme), backend.served)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.storage.database_path.display(),
        "ai readiness check ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
