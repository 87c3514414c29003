use std::env;

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum accepted video upload size in bytes (default: 512 MB)
    pub max_upload_size: usize,

    /// Directory where uploaded files are stored (default: "storage")
    pub storage_base_path: String,

    /// Base URL prepended to stored file paths; must match the mount the
    /// files are served under (default: "/storage")
    pub public_base_url: String,

    /// Base URL of the player page embedded in QR images; empty means the
    /// image carries the bare code value
    pub play_base_url: String,

    /// JWT signing secret (required in production)
    pub jwt_secret: String,

    /// JWT lifetime in minutes (default: 60)
    pub jwt_expiry_minutes: i64,

    /// Username for the seeded admin account (default: "admin")
    pub default_admin_username: String,

    /// Password for the seeded admin account (default: "admin123")
    pub default_admin_password: String,

    /// Allowed CORS origins (comma separated); "*" allows any
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 512 * 1024 * 1024, // 512 MB
            storage_base_path: "storage".to_string(),
            public_base_url: "/storage".to_string(),
            play_base_url: String::new(),
            jwt_secret: "secret".to_string(),
            jwt_expiry_minutes: 60,
            default_admin_username: "admin".to_string(),
            default_admin_password: "admin123".to_string(),
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            storage_base_path: env::var("STORAGE_BASE_PATH").unwrap_or(default.storage_base_path),

            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(default.public_base_url),

            play_base_url: env::var("PLAY_BASE_URL").unwrap_or(default.play_base_url),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            jwt_expiry_minutes: env::var("JWT_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.jwt_expiry_minutes),

            default_admin_username: env::var("DEFAULT_ADMIN_USERNAME")
                .unwrap_or(default.default_admin_username),

            default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or(default.default_admin_password),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }
}
