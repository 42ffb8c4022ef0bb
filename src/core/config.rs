use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub moderation: ModerationConfig,
    pub ledger: LedgerConfig,
    pub content: ContentConfig,
    pub webhook: WebhookConfig,
    pub image_gen: Option<ImageGenConfig>,
    pub minio: MinIOConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    pub request_timeout: Duration,
}

/// Which adapter backs the `BoardStore` port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local state, lost on restart. Meant for local runs and demos.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Static shared secrets gating the moderation surfaces
#[derive(Clone)]
pub struct ModerationConfig {
    /// Compared against the `x-admin-key` header
    pub admin_key: String,
    /// Compared against `Authorization: Bearer <token>` on the image queue
    pub queue_token: String,
}

impl std::fmt::Debug for ModerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationConfig")
            .field("admin_key", &"***")
            .field("queue_token", &"***")
            .finish()
    }
}

/// Report ledger policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum reports a single voter may file in the trailing hour
    pub report_rate_limit_per_hour: u32,
    /// report_count at which a submission gets soft-hidden; 0 disables flagging
    pub report_flag_threshold: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    pub blocklist: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub discord_url: Option<String>,
    pub timeout: Duration,
}

/// Cloudflare Workers AI settings. Absent when account or token is unset.
#[derive(Clone)]
pub struct ImageGenConfig {
    pub account_id: String,
    pub api_token: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ImageGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenConfig")
            .field("account_id", &self.account_id)
            .field("api_token", &"***")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// MinIO/S3 storage configuration for generated images
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for publicly accessible files (optional, defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix under which generated images are stored and publicly readable
    pub public_prefix: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Look up `key`, falling back to `default` when unset, and parse it
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    T: FromStr + ToString,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid number", key))
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn comma_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse::<StorageBackend>()?;

        let database = match storage {
            StorageBackend::Postgres => Some(DatabaseConfig::from_lookup(&lookup)?),
            StorageBackend::Memory => None,
        };

        Ok(Config {
            app: AppConfig::from_lookup(&lookup)?,
            storage,
            database,
            moderation: ModerationConfig::from_lookup(&lookup)?,
            ledger: LedgerConfig::from_lookup(&lookup)?,
            content: ContentConfig::from_lookup(&lookup),
            webhook: WebhookConfig::from_lookup(&lookup)?,
            image_gen: ImageGenConfig::from_lookup(&lookup)?,
            minio: MinIOConfig::from_lookup(&lookup),
            swagger: SwaggerConfig::from_lookup(&lookup),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = comma_list(Some(
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
        ));

        let max_request_body_size = parse_or(
            lookup,
            "MAX_REQUEST_BODY_SIZE",
            Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
        )?;
        let request_timeout_secs = parse_or(
            lookup,
            "REQUEST_TIMEOUT_SECS",
            Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(lookup, "DATABASE_URL").ok_or_else(|| {
            "DATABASE_URL must be set (or use STORAGE_BACKEND=memory)".to_string()
        })?;

        Ok(Self {
            url,
            max_connections: parse_or(
                lookup,
                "DB_MAX_CONNECTIONS",
                Self::DEFAULT_MAX_CONNECTIONS,
            )?,
            min_connections: parse_or(
                lookup,
                "DB_MIN_CONNECTIONS",
                Self::DEFAULT_MIN_CONNECTIONS,
            )?,
            acquire_timeout_secs: parse_or(
                lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_or(
                lookup,
                "DB_IDLE_TIMEOUT_SECS",
                Self::DEFAULT_IDLE_TIMEOUT_SECS,
            )?,
            max_lifetime_secs: parse_or(
                lookup,
                "DB_MAX_LIFETIME_SECS",
                Self::DEFAULT_MAX_LIFETIME_SECS,
            )?,
        })
    }
}

impl ModerationConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_key = non_empty(lookup, "ADMIN_KEY")
            .ok_or_else(|| "ADMIN_KEY environment variable is required".to_string())?;
        let queue_token = non_empty(lookup, "ADMIN_QUEUE_TOKEN")
            .ok_or_else(|| "ADMIN_QUEUE_TOKEN environment variable is required".to_string())?;

        Ok(Self {
            admin_key,
            queue_token,
        })
    }
}

impl LedgerConfig {
    pub const DEFAULT_REPORT_RATE_LIMIT_PER_HOUR: u32 = 5;
    pub const DEFAULT_REPORT_FLAG_THRESHOLD: u32 = 5;

    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let report_rate_limit_per_hour = parse_or(
            lookup,
            "REPORT_RATE_LIMIT_PER_HOUR",
            Self::DEFAULT_REPORT_RATE_LIMIT_PER_HOUR,
        )?;
        if report_rate_limit_per_hour == 0 {
            return Err("REPORT_RATE_LIMIT_PER_HOUR must be at least 1".to_string());
        }

        Ok(Self {
            report_rate_limit_per_hour,
            report_flag_threshold: parse_or(
                lookup,
                "REPORT_FLAG_THRESHOLD",
                Self::DEFAULT_REPORT_FLAG_THRESHOLD,
            )?,
        })
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            report_rate_limit_per_hour: Self::DEFAULT_REPORT_RATE_LIMIT_PER_HOUR,
            report_flag_threshold: Self::DEFAULT_REPORT_FLAG_THRESHOLD,
        }
    }
}

impl ContentConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            blocklist: comma_list(lookup("CONTENT_BLOCKLIST")),
        }
    }
}

impl WebhookConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        // The publish-specific hook wins over the generic one
        let discord_url = non_empty(lookup, "DISCORD_PUBLISH_WEBHOOK_URL")
            .or_else(|| non_empty(lookup, "DISCORD_WEBHOOK_URL"));
        let timeout_secs = parse_or(lookup, "WEBHOOK_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            discord_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ImageGenConfig {
    const DEFAULT_MODEL: &'static str = "@cf/black-forest-labs/flux-1-schnell";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;

    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_id =
            non_empty(lookup, "CF_ACCOUNT_ID").or_else(|| non_empty(lookup, "CLOUDFLARE_ACCOUNT_ID"));
        let api_token =
            non_empty(lookup, "CF_API_TOKEN").or_else(|| non_empty(lookup, "CLOUDFLARE_API_TOKEN"));

        let (Some(account_id), Some(api_token)) = (account_id, api_token) else {
            return Ok(None);
        };

        let model = non_empty(lookup, "CF_MODEL").unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());
        let timeout_secs = parse_or(lookup, "IMAGE_GEN_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Some(Self {
            account_id,
            api_token,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

impl MinIOConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint =
            lookup("MINIO_ENDPOINT").unwrap_or_else(|| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint = lookup("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|| endpoint.clone());

        Self {
            endpoint,
            public_endpoint,
            access_key: lookup("MINIO_ACCESS_KEY").unwrap_or_else(|| "minioadmin".to_string()),
            secret_key: lookup("MINIO_SECRET_KEY").unwrap_or_else(|| "minioadmin".to_string()),
            bucket: lookup("MINIO_BUCKET").unwrap_or_else(|| "costachisme-ai-images".to_string()),
            region: lookup("MINIO_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            public_prefix: lookup("MINIO_PUBLIC_PREFIX").unwrap_or_else(|| "public".to_string()),
        }
    }
}

impl SwaggerConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: non_empty(lookup, "SWAGGER_USERNAME"),
            password: non_empty(lookup, "SWAGGER_PASSWORD"),
            title: lookup("SWAGGER_TITLE").unwrap_or_else(|| "Costachisme API".to_string()),
            version: lookup("SWAGGER_VERSION").unwrap_or_else(|| "0.1.0".to_string()),
            description: lookup("SWAGGER_DESCRIPTION")
                .unwrap_or_else(|| "Rumores y reportes ciudadanos de Costachisme".to_string()),
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRETS: [(&str, &str); 2] = [("ADMIN_KEY", "k"), ("ADMIN_QUEUE_TOKEN", "t")];

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        let lookup = lookup_from(&[SECRETS[0], SECRETS[1], ("STORAGE_BACKEND", "memory")]);
        let config = Config::from_lookup(lookup).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.database.is_none());
        assert_eq!(config.ledger, LedgerConfig::default());
        assert!(config.image_gen.is_none());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let lookup = lookup_from(&SECRETS);
        let err = Config::from_lookup(lookup).unwrap_err();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    fn test_admin_key_is_required() {
        let lookup = lookup_from(&[("STORAGE_BACKEND", "memory"), ("ADMIN_QUEUE_TOKEN", "t")]);
        let err = Config::from_lookup(lookup).unwrap_err();
        assert!(err.contains("ADMIN_KEY"));
    }

    #[test]
    fn test_ledger_thresholds_are_configurable() {
        let lookup = lookup_from(&[
            SECRETS[0],
            SECRETS[1],
            ("STORAGE_BACKEND", "memory"),
            ("REPORT_RATE_LIMIT_PER_HOUR", "2"),
            ("REPORT_FLAG_THRESHOLD", "0"),
        ]);
        let config = Config::from_lookup(lookup).unwrap();

        assert_eq!(config.ledger.report_rate_limit_per_hour, 2);
        assert_eq!(config.ledger.report_flag_threshold, 0);
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let lookup = lookup_from(&[
            SECRETS[0],
            SECRETS[1],
            ("STORAGE_BACKEND", "memory"),
            ("REPORT_RATE_LIMIT_PER_HOUR", "0"),
        ]);
        assert!(Config::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_publish_webhook_wins_over_generic() {
        let lookup = lookup_from(&[
            SECRETS[0],
            SECRETS[1],
            ("STORAGE_BACKEND", "memory"),
            ("DISCORD_WEBHOOK_URL", "https://discord.test/generic"),
            ("DISCORD_PUBLISH_WEBHOOK_URL", "https://discord.test/publish"),
        ]);
        let config = Config::from_lookup(lookup).unwrap();
        assert_eq!(
            config.webhook.discord_url.as_deref(),
            Some("https://discord.test/publish")
        );
    }

    #[test]
    fn test_blocklist_is_split_and_trimmed() {
        let lookup = lookup_from(&[
            SECRETS[0],
            SECRETS[1],
            ("STORAGE_BACKEND", "memory"),
            ("CONTENT_BLOCKLIST", " tonto, ,menso "),
        ]);
        let config = Config::from_lookup(lookup).unwrap();
        assert_eq!(config.content.blocklist, vec!["tonto", "menso"]);
    }

    #[test]
    fn test_image_gen_enabled_with_account_and_token() {
        let lookup = lookup_from(&[
            SECRETS[0],
            SECRETS[1],
            ("STORAGE_BACKEND", "memory"),
            ("CF_ACCOUNT_ID", "acc"),
            ("CF_API_TOKEN", "tok"),
        ]);
        let image_gen = Config::from_lookup(lookup).unwrap().image_gen.unwrap();
        assert_eq!(image_gen.model, "@cf/black-forest-labs/flux-1-schnell");
        assert_eq!(image_gen.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "Postgres".parse::<StorageBackend>().unwrap(),
            StorageBackend::Postgres
        );
        assert_eq!(
            "memory".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
