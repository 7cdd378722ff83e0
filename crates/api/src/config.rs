use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// JWT authentication configuration
    pub jwt: JwtAuthConfig,
    /// Outbound email configuration
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Allowed browser origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per minute per signed-in user. 0 disables the limiter.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing tokens
    pub private_key: String,

    /// RSA public key in PEM format for verifying tokens
    pub public_key: String,

    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Clock skew tolerance when checking `exp`
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

/// Outbound email configuration for decision notices.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// When false, messages are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,

    /// `console` or `resend`
    #[serde(default = "default_email_provider")]
    pub provider: String,

    #[serde(default)]
    pub resend_api_key: String,

    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,

    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default = "default_email_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            resend_api_key: String::new(),
            resend_base_url: default_resend_base_url(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            timeout_secs: default_email_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Accounts registering with this email receive the admin role.
    #[serde(default)]
    pub bootstrap_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Email the requester after a decision made from the review queue.
    #[serde(default = "default_true")]
    pub notify_on_review_decision: bool,

    #[serde(default = "default_change_feed_capacity")]
    pub change_feed_capacity: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            notify_on_review_decision: true,
            change_feed_capacity: default_change_feed_capacity(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_access_token_expiry() -> i64 {
    3600
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_sender_email() -> String {
    "onboarding@resend.dev".to_string()
}
fn default_sender_name() -> String {
    "CropMate".to_string()
}
fn default_email_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_change_feed_capacity() -> usize {
    256
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml
    /// 2. config/local.toml (optional, not in git)
    /// 3. Environment variables with CM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CM").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a config from embedded defaults plus overrides, without touching files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = ""

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 100

            [jwt]
            private_key = "test-private-key"
            public_key = "test-public-key"

            [email]
            enabled = false
            provider = "console"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CM__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        match self.email.provider.as_str() {
            "console" => {}
            "resend" => {
                if self.email.enabled && self.email.resend_api_key.is_empty() {
                    return Err(ConfigValidationError::MissingRequired(
                        "CM__EMAIL__RESEND_API_KEY is required for the resend provider"
                            .to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown email provider: {}",
                    other
                )));
            }
        }

        if self.notifications.change_feed_capacity == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "change_feed_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
