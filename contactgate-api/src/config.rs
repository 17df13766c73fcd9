/// Configuration management for the web server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. A `.env` file in the working directory
/// is loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string. When absent it is built
///   from `DB_HOST` (default: localhost), `DB_PORT` (default: 5432),
///   `DB_NAME`, `DB_USER` and `DB_PASSWORD`
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 3000)
/// - `SESSION_SECRET`: Secret key for session signing (required, 32+ chars)
/// - `SESSION_TTL_HOURS`: Session lifetime (default: 24)
/// - `PRODUCTION`: Secure cookies and HSTS (default: false)
/// - `CONTACTS_CSV_PATH`: Contacts file (default: resources/risultati_moka.csv)
/// - `CONTACTS_CSV_STRICT`: Reject malformed rows (default: true)
/// - `EMAIL_HOST`, `EMAIL_PORT` (default: 587), `EMAIL_USER`, `EMAIL_PASS`:
///   mail settings; read but not used for sending
/// - `RUST_LOG`: Log level
///
/// # Example
///
/// ```no_run
/// use contactgate_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use contactgate_shared::contacts::ParseMode;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default location of the contacts file, relative to the working directory
pub const DEFAULT_CSV_PATH: &str = "resources/risultati_moka.csv";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session cookie configuration
    pub session: SessionConfig,

    /// Contacts file configuration
    pub contacts: ContactsConfig,

    /// Mail settings
    pub email: EmailConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode: `Secure` cookies and HSTS
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session cookie configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// Secret key for session token signing
    ///
    /// Must be at least 32 characters. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session lifetime in hours
    pub ttl_hours: i64,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Contacts file configuration
#[derive(Debug, Clone)]
pub struct ContactsConfig {
    /// Path of the CSV file, read on every request
    pub csv_path: PathBuf,

    /// How malformed rows are handled
    pub parse_mode: ParseMode,
}

/// Mail settings
///
/// Recognized so deployments can keep their existing environment, but the
/// `/send-email` endpoint never opens a connection.
#[derive(Clone, Default)]
pub struct EmailConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl EmailConfig {
    /// True when a mail host is set
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&var, "PORT", 3000u16)?;
        let production = parse_or(&var, "PRODUCTION", false)?;

        let database_url = database_url(&lookup)?;
        let max_connections = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let secret = var("SESSION_SECRET")
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters long");
        }
        let ttl_hours = parse_or(&var, "SESSION_TTL_HOURS", 24i64)?;
        if ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive");
        }

        let csv_path = var("CONTACTS_CSV_PATH").unwrap_or_else(|| DEFAULT_CSV_PATH.to_string());
        let strict = parse_or(&var, "CONTACTS_CSV_STRICT", true)?;

        let email = EmailConfig {
            host: var("EMAIL_HOST"),
            port: parse_or(&var, "EMAIL_PORT", 587u16)?,
            user: var("EMAIL_USER"),
            pass: var("EMAIL_PASS"),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig { secret, ttl_hours },
            contacts: ContactsConfig {
                csv_path: PathBuf::from(csv_path),
                parse_mode: ParseMode::from_strict(strict),
            },
            email,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Session lifetime as a duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session.ttl_hours)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Resolves the database URL from `DATABASE_URL` or, failing that, from the
/// `DB_*` parts
///
/// `DB_USER` and `DB_PASSWORD` are percent-encoded; `DATABASE_URL` is used as
/// given.
pub fn database_url<F>(lookup: F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(url) = var("DATABASE_URL") {
        return Ok(url);
    }

    let host = var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = parse_or(&var, "DB_PORT", 5432u16)?;
    let name = var("DB_NAME")
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or DB_NAME environment variable is required"))?;
    let user = var("DB_USER")
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or DB_USER environment variable is required"))?;

    let user = urlencoding::encode(&user);
    let credentials = match var("DB_PASSWORD") {
        Some(password) => format!("{}:{}", user, urlencoding::encode(&password)),
        None => user.into_owned(),
    };

    Ok(format!("postgres://{}@{}:{}/{}", credentials, host, port, name))
}
