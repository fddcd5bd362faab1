use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
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

/// Signing configuration for locally issued bearer tokens
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl: Duration,
    pub jwt_leeway: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_ttl", &self.token_ttl)
            .field("jwt_leeway", &self.jwt_leeway)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Where family photos are written
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Plain directory on the local filesystem
    Local { upload_dir: PathBuf },
    /// MinIO/S3-compatible bucket
    MinIO(MinIOConfig),
}

/// MinIO/S3 storage configuration for photo uploads
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL used to build photo links (defaults to endpoint)
    pub public_endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing photos
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Key prefix for family photos (e.g., "families")
    pub prefix: String,
}

/// Credentials for the provisioning command. Never read by the server.
#[derive(Clone)]
pub struct BootstrapConfig {
    pub username: String,
    pub password: String,
    pub province: Option<String>,
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("province", &self.province)
            .finish()
    }
}

/// Load `.env` if present; a missing file is fine in production.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        load_dotenv();

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative pool defaults; a field survey backend sees low concurrency
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_ISSUER: &'static str = "census-registry";
    const DEFAULT_TOKEN_TTL_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute
    const MIN_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET environment variable is required".to_string())?;

        if jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| Self::DEFAULT_ISSUER.to_string());

        let token_ttl_secs = env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_TTL_SECS must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY_SECS must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            issuer,
            token_ttl: Duration::from_secs(token_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Census Registry API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Household registration, duplicate detection, sync tracking and zone assignment"
                .to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns "username:password" when both are configured
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some(format!("{}:{}", u, p)),
            _ => None,
        }
    }
}

impl StorageConfig {
    const DEFAULT_UPLOAD_DIR: &'static str = "uploads";

    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("PHOTO_STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());

        match backend.to_lowercase().as_str() {
            "local" => {
                let upload_dir = env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_DIR.to_string())
                    .into();
                Ok(StorageConfig::Local { upload_dir })
            }
            "minio" | "s3" => Ok(StorageConfig::MinIO(MinIOConfig::from_env()?)),
            other => Err(format!(
                "PHOTO_STORAGE_BACKEND must be 'local' or 'minio', got '{}'",
                other
            )),
        }
    }
}

impl MinIOConfig {
    const DEFAULT_REGION: &'static str = "us-east-1";
    const DEFAULT_PREFIX: &'static str = "families";

    pub fn from_env() -> Result<Self, String> {
        let endpoint = env::var("MINIO_ENDPOINT")
            .map_err(|_| "MINIO_ENDPOINT environment variable is required".to_string())?;

        let public_endpoint = env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY")
            .map_err(|_| "MINIO_ACCESS_KEY environment variable is required".to_string())?;

        let secret_key = env::var("MINIO_SECRET_KEY")
            .map_err(|_| "MINIO_SECRET_KEY environment variable is required".to_string())?;

        let bucket = env::var("MINIO_BUCKET")
            .map_err(|_| "MINIO_BUCKET environment variable is required".to_string())?;

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| Self::DEFAULT_REGION.to_string());

        let prefix =
            env::var("MINIO_PHOTO_PREFIX").unwrap_or_else(|_| Self::DEFAULT_PREFIX.to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            prefix,
        })
    }
}

impl BootstrapConfig {
    pub fn from_env() -> Result<Self, String> {
        load_dotenv();

        let username = env::var("SUPERUSER_USERNAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "SUPERUSER_USERNAME must be set".to_string())?;

        let password = env::var("SUPERUSER_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SUPERUSER_PASSWORD must be set".to_string())?;

        let province = env::var("SUPERUSER_PROVINCE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            username,
            password,
            province,
        })
    }
}
