use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub uploads: UploadConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Google Identity Services sign-in and session lifetime
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// OAuth client id the ID token audience must match
    pub google_client_id: String,
    pub google_jwks_url: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
    pub session_ttl: Duration,
    /// How often expired sessions and stale drafts are swept
    pub cleanup_interval: Duration,
    /// Lowercased emails allowed to change report status
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_photo_bytes: usize,
}

/// Geolocation and geocoding collaborators
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// Position reported by the "use current position" affordance, if any
    pub device_position: Option<(f64, f64)>,
    /// Nominatim-compatible base URL; geocoding is disabled when unset
    pub geocoder_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            uploads: UploadConfig::from_env()?,
            location: LocationConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = split_list(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

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

impl AuthConfig {
    const DEFAULT_JWKS_URL: &'static str = "https://www.googleapis.com/oauth2/v3/certs";
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;
    const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 3600;
    const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

    pub fn from_env() -> Result<Self, String> {
        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| "GOOGLE_CLIENT_ID environment variable is required".to_string())?;

        let google_jwks_url =
            env::var("GOOGLE_JWKS_URL").unwrap_or_else(|_| Self::DEFAULT_JWKS_URL.to_string());

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        let cleanup_interval_secs = env::var("CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CLEANUP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| "CLEANUP_INTERVAL_SECS must be a positive number".to_string())?;

        let admin_emails = split_list(&env::var("ADMIN_EMAILS").unwrap_or_default())
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect();

        Ok(Self {
            google_client_id,
            google_jwks_url,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
            session_ttl: Duration::from_secs(session_ttl_secs),
            cleanup_interval: Duration::from_secs(cleanup_interval_secs),
            admin_emails,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Urban Fix API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for Urban Fix civic issue reporting".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl UploadConfig {
    const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024; // 5MB

    pub fn from_env() -> Result<Self, String> {
        let max_photo_bytes = env::var("MAX_PHOTO_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_PHOTO_BYTES.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_PHOTO_BYTES must be a valid number".to_string())?;

        Ok(Self { max_photo_bytes })
    }
}

impl LocationConfig {
    pub fn from_env() -> Result<Self, String> {
        let device_position = parse_position(
            env::var("DEVICE_LAT").ok().as_deref(),
            env::var("DEVICE_LNG").ok().as_deref(),
        )?;

        let geocoder_url = env::var("GEOCODER_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            device_position,
            geocoder_url,
        })
    }
}

/// Split a comma-separated env value, dropping empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Both coordinates must be set together and be in range
fn parse_position(lat: Option<&str>, lng: Option<&str>) -> Result<Option<(f64, f64)>, String> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let lat = lat
                .trim()
                .parse::<f64>()
                .map_err(|_| "DEVICE_LAT must be a valid number".to_string())?;
            let lng = lng
                .trim()
                .parse::<f64>()
                .map_err(|_| "DEVICE_LNG must be a valid number".to_string())?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err("DEVICE_LAT/DEVICE_LNG out of range".to_string());
            }
            Ok(Some((lat, lng)))
        }
        _ => Err("DEVICE_LAT and DEVICE_LNG must be set together".to_string()),
    }
}
