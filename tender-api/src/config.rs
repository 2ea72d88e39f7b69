/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: MySQL connection string (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 4000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `PUBLIC_BASE_URL`: Base URL used in recovery links (default: http://localhost:4000)
/// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`
/// - `FCM_PROJECT_ID`, `FCM_SERVICE_ACCOUNT_PATH`
///
/// SMTP and push are optional; when their variables are missing the server
/// falls back to logging senders.
///
/// # Example
///
/// ```no_run
/// use tender_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use tender_shared::mail::SmtpSettings;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// SMTP configuration, if mail delivery is enabled
    pub smtp: Option<SmtpConfig>,

    /// Firebase configuration, if push delivery is enabled
    pub push: Option<PushConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode turns on HSTS
    pub production: bool,

    /// Externally reachable base URL of this server
    pub public_base_url: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MySQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Minimum idle connections
    pub min_connections: u32,

    /// Acquire timeout in seconds
    pub connect_timeout_seconds: u64,
}

/// SMTP relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// Sender address, e.g. `Tender <noreply@tender.kg>`
    pub from: String,
}

/// Firebase Cloud Messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub project_id: String,

    /// Path to the service account JSON key
    pub service_account_path: String,
}

impl From<SmtpConfig> for SmtpSettings {
    fn from(config: SmtpConfig) -> Self {
        SmtpSettings {
            host: config.host,
            port: config.port,
            username: config.username,
            password: config.password,
            from: config.from,
        }
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing
    /// - A numeric or boolean variable has an invalid value
    /// - Only part of the SMTP or FCM variables are set
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u16>()?;
        let cors_origins =
            parse_cors_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = env::var("PRODUCTION")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", api_port));

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "35".to_string())
            .parse::<u32>()?;
        let min_connections = env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<u32>()?;
        let connect_timeout_seconds = env::var("DATABASE_CONNECT_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()?;

        let smtp = match optional("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()?,
                username: optional("SMTP_USERNAME")
                    .ok_or_else(|| anyhow::anyhow!("SMTP_USERNAME is required when SMTP_HOST is set"))?,
                password: optional("SMTP_PASSWORD")
                    .ok_or_else(|| anyhow::anyhow!("SMTP_PASSWORD is required when SMTP_HOST is set"))?,
                from: optional("SMTP_FROM")
                    .ok_or_else(|| anyhow::anyhow!("SMTP_FROM is required when SMTP_HOST is set"))?,
            }),
            None => None,
        };

        let push = match (optional("FCM_PROJECT_ID"), optional("FCM_SERVICE_ACCOUNT_PATH")) {
            (Some(project_id), Some(service_account_path)) => Some(PushConfig {
                project_id,
                service_account_path,
            }),
            (None, None) => None,
            _ => anyhow::bail!(
                "FCM_PROJECT_ID and FCM_SERVICE_ACCOUNT_PATH must be set together"
            ),
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
                public_base_url,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                min_connections,
                connect_timeout_seconds,
            },
            smtp,
            push,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for [`tender_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> tender_shared::db::pool::DatabaseConfig {
        tender_shared::db::pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_seconds: self.database.connect_timeout_seconds,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
                cors_origins: vec!["*".to_string()],
                production: false,
                public_base_url: "http://localhost:4000".to_string(),
            },
            database: DatabaseConfig {
                url: "mysql://localhost/test".to_string(),
                max_connections: 35,
                min_connections: 2,
                connect_timeout_seconds: 30,
            },
            smtp: None,
            push: None,
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:4000");
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(parse_cors_origins("*"), vec!["*"]);
        assert_eq!(
            parse_cors_origins("https://a.kg, https://b.kg,"),
            vec!["https://a.kg", "https://b.kg"]
        );
    }

    #[test]
    fn test_pool_config_keeps_shared_timeouts() {
        let pool = test_config().pool_config();
        assert_eq!(pool.max_connections, 35);
        assert_eq!(pool.min_connections, 2);
        assert_eq!(pool.idle_timeout_seconds, Some(600));
        assert!(pool.test_before_acquire);
    }

    #[test]
    fn test_smtp_settings_conversion() {
        let settings: SmtpSettings = SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: "tender".to_string(),
            password: "secret".to_string(),
            from: "tender@example.com".to_string(),
        }
        .into();

        assert_eq!(settings.host, "smtp.gmail.com");
        assert_eq!(settings.from, "tender@example.com");
    }
}
