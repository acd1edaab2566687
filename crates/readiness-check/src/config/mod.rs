use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::theme::ThemePreference;
use crate::workflows::readiness::storage::UrlPolicy;

const DEFAULT_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub branding: BrandingConfig,
    pub theme: ThemePreference,
}

impl AppConfig {
    /// Read configuration from the process environment, after loading an optional `.env`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = AppEnvironment::from_str(&var("APP_ENV", "development"));

        let host = var("APP_HOST", "127.0.0.1");
        let port = var("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var("APP_LOG_LEVEL", "info");
        let log_format = LogFormat::parse(&var("APP_LOG_FORMAT", "compact"))?;

        let public_base_url = var("APP_PUBLIC_BASE_URL", "http://127.0.0.1:3000");
        let artifacts = match var("APP_ARTIFACT_BACKEND", "filesystem")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "filesystem" | "fs" => ArtifactBackendConfig::Filesystem {
                root: PathBuf::from(var("APP_ARTIFACT_DIR", "data/artifacts")),
            },
            "http" => {
                let endpoint =
                    optional("APP_ARTIFACT_ENDPOINT").ok_or(ConfigError::MissingArtifactEndpoint)?;
                ArtifactBackendConfig::Http {
                    public_url: optional("APP_ARTIFACT_PUBLIC_URL")
                        .unwrap_or_else(|| endpoint.clone()),
                    endpoint,
                    token: optional("APP_ARTIFACT_TOKEN"),
                }
            }
            other => return Err(ConfigError::InvalidArtifactBackend(other.to_string())),
        };

        let ttl_raw = var("APP_URL_TTL_SECS", &DEFAULT_URL_TTL_SECS.to_string());
        let ttl = ttl_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidTtl(ttl_raw))?;
        let url_policy = match optional("APP_URL_SIGNING_SECRET") {
            Some(secret) => UrlPolicy::Signed { secret, ttl },
            None => UrlPolicy::Public,
        };

        let theme = var("APP_THEME", "system")
            .parse::<ThemePreference>()
            .map_err(ConfigError::InvalidTheme)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            storage: StorageConfig {
                database_path: PathBuf::from(var("APP_DATABASE_PATH", "data/ai-readiness.db")),
                artifacts,
                public_base_url,
                url_policy,
            },
            branding: BrandingConfig {
                logo_path: optional("APP_LOGO_PATH").map(PathBuf::from),
            },
            theme,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactBackendConfig {
    Filesystem {
        root: PathBuf,
    },
    Http {
        endpoint: String,
        public_url: String,
        token: Option<String>,
    },
}

/// Where result metadata and report artifacts live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub artifacts: ArtifactBackendConfig,
    pub public_base_url: String,
    pub url_policy: UrlPolicy,
}

impl StorageConfig {
    /// Base URL under which the service serves filesystem artifacts.
    pub fn artifact_base_url(&self) -> String {
        format!("{}/artifacts", self.public_base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrandingConfig {
    pub logo_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidArtifactBackend(String),
    MissingArtifactEndpoint,
    InvalidTtl(String),
    InvalidTheme(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be `compact` or `json`, got `{value}`")
            }
            ConfigError::InvalidArtifactBackend(value) => {
                write!(f, "APP_ARTIFACT_BACKEND must be `filesystem` or `http`, got `{value}`")
            }
            ConfigError::MissingArtifactEndpoint => {
                write!(f, "APP_ARTIFACT_ENDPOINT is required for the http artifact backend")
            }
            ConfigError::InvalidTtl(value) => {
                write!(f, "APP_URL_TTL_SECS must be a positive number of seconds, got `{value}`")
            }
            ConfigError::InvalidTheme(reason) => write!(f, "APP_THEME is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
