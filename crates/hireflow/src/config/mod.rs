use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub data: DataConfig,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("APP_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig {
                dir: PathBuf::from(data_dir),
            },
            providers: ProviderConfig::from_env(),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the JSON-backed stores (roles, questions, analytics, slots).
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
}

/// Credentials for the external mail and meeting providers.
///
/// Every field is read verbatim from the environment. Blank values stay
/// blank; there are no embedded fallback secrets, and [`ProviderConfig::require`]
/// rejects a configuration with anything missing.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub company_name: String,
    pub email_sender: String,
    pub email_passkey: String,
    pub email_relay: String,
    pub zoom_account_id: String,
    pub zoom_client_id: String,
    pub zoom_client_secret: String,
}

impl ProviderConfig {
    fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default().trim().to_string();

        Self {
            company_name: var("COMPANY_NAME"),
            email_sender: var("EMAIL_SENDER"),
            email_passkey: var("EMAIL_PASSKEY"),
            email_relay: {
                let relay = var("EMAIL_RELAY");
                if relay.is_empty() {
                    "smtp.gmail.com".to_string()
                } else {
                    relay
                }
            },
            zoom_account_id: var("ZOOM_ACCOUNT_ID"),
            zoom_client_id: var("ZOOM_CLIENT_ID"),
            zoom_client_secret: var("ZOOM_CLIENT_SECRET"),
        }
    }

    /// Names of the required variables that are currently unset or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.company_name.is_empty() {
            missing.push("COMPANY_NAME");
        }
        if self.email_sender.is_empty() {
            missing.push("EMAIL_SENDER");
        }
        if self.email_passkey.is_empty() {
            missing.push("EMAIL_PASSKEY");
        }
        if self.zoom_account_id.is_empty() {
            missing.push("ZOOM_ACCOUNT_ID");
        }
        if self.zoom_client_id.is_empty() {
            missing.push("ZOOM_CLIENT_ID");
        }
        if self.zoom_client_secret.is_empty() {
            missing.push("ZOOM_CLIENT_SECRET");
        }
        missing
    }

    pub fn require(&self) -> Result<(), ConfigError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingCredentials(Vec<&'static str>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingCredentials(names) => {
                write!(f, "missing required credentials: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::MissingCredentials(_) => None,
        }
    }
}
