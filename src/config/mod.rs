//! Service configuration from the environment (and `.env`, when present).

use crate::error::ConfigError;
use crate::store::check_collection_name;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;

/// Which document store backs the collections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL, one JSONB table per collection.
    Postgres,
    /// Process-local; data is lost on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Collection name per resource type. Each has its own variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionNames {
    pub students: String,
    pub teachers: String,
    pub courses: String,
    pub disciplines: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        CollectionNames {
            students: "alunos".into(),
            teachers: "professores".into(),
            courses: "cursos".into(),
            disciplines: "disciplinas".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    /// From `DATABASE_URL`, or assembled from the `DB_*` parts.
    pub database: PgConnectOptions,
    /// Schema holding the collection tables.
    pub db_schema: String,
    pub max_connections: u32,
    pub collections: CollectionNames,
    pub request_timeout: Duration,
    pub body_limit: usize,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "localhost".into(),
            port: 5001,
            backend: StoreBackend::Postgres,
            database: PgConnectOptions::new()
                .host("localhost")
                .port(5432)
                .database("desafio"),
            db_schema: "desafio".into(),
            max_connections: 5,
            collections: CollectionNames::default(),
            request_timeout: Duration::from_secs(30),
            body_limit: 1024 * 1024,
            log_filter: "campus_api=info,tower_http=info".into(),
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: format!("'{}': {}", raw, e),
    })
}

fn identifier(key: &'static str, name: String) -> Result<String, ConfigError> {
    check_collection_name(&name).map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("'{}' is not a plain identifier", name),
    })?;
    Ok(name)
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or empty variables take their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let host = get("HOST").unwrap_or(defaults.host);
        let port = match get("MY_APP_PORT") {
            Some(raw) => parse_var("MY_APP_PORT", raw)?,
            None => defaults.port,
        };
        let backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.backend,
        };
        let database = match get("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: e.to_string(),
            })?,
            None => {
                let port = match get("DB_PORT") {
                    Some(raw) => parse_var("DB_PORT", raw)?,
                    None => 5432,
                };
                // Credentials are set as fields, never spliced into a URL.
                let mut options = PgConnectOptions::new()
                    .host(&get("DB_HOST").unwrap_or_else(|| "localhost".into()))
                    .port(port)
                    .database(&get("DB_NAME").unwrap_or_else(|| "desafio".into()));
                if let Some(user) = get("DB_USER") {
                    options = options.username(&user);
                }
                if let Some(password) = get("DB_PASSWORD") {
                    options = options.password(&password);
                }
                options
            }
        };
        let db_schema = identifier("DB_SCHEMA", get("DB_SCHEMA").unwrap_or(defaults.db_schema))?;
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => parse_var("DB_MAX_CONNECTIONS", raw)?,
            None => defaults.max_connections,
        };
        let d = defaults.collections;
        let collections = CollectionNames {
            students: identifier("ALUNOS_COLLECTION", get("ALUNOS_COLLECTION").unwrap_or(d.students))?,
            teachers: identifier(
                "PROFESSORES_COLLECTION",
                get("PROFESSORES_COLLECTION").unwrap_or(d.teachers),
            )?,
            courses: identifier("CURSOS_COLLECTION", get("CURSOS_COLLECTION").unwrap_or(d.courses))?,
            disciplines: identifier(
                "DISCIPLINAS_COLLECTION",
                get("DISCIPLINAS_COLLECTION").unwrap_or(d.disciplines),
            )?,
        };
        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", raw)?),
            None => defaults.request_timeout,
        };
        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(raw) => parse_var("BODY_LIMIT_BYTES", raw)?,
            None => defaults.body_limit,
        };
        let log_filter = get("RUST_LOG").unwrap_or(defaults.log_filter);

        Ok(AppConfig {
            host,
            port,
            backend,
            database,
            db_schema,
            max_connections,
            collections,
            request_timeout,
            body_limit,
            log_filter,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
