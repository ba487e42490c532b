use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connection settings for the pooled SMTP relay.
///
/// Pool limits are handed to lettre as-is; this service does not enforce
/// them itself.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Use STARTTLS on the relay connection
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    /// Maximum pooled connections
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
    /// Seconds an idle pooled connection is kept alive
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_seconds: u64,
}

/// Process-wide sender identity stamped on every outgoing message.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    /// Display name shown in the From header
    #[serde(default = "default_sender_name")]
    pub name: String,
    /// From address
    #[serde(default = "default_sender_address")]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Directory of `.hbs` template files, loaded at startup
    #[serde(default = "default_template_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Highest attempt index that is retried after a delivery failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff base delay in milliseconds (doubles per attempt)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_pool_max_size() -> u32 {
    10
}

fn default_pool_idle_timeout() -> u64 {
    60
}

fn default_sender_name() -> String {
    "Notifications".to_string()
}

fn default_sender_address() -> String {
    "noreply@localhost".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("smtp.host", "localhost")?
            .set_default("smtp.port", 587)?
            .set_default("smtp.starttls", true)?
            .set_default("smtp.pool_max_size", 10)?
            .set_default("smtp.pool_idle_timeout_seconds", 60)?
            .set_default("sender.name", "Notifications")?
            .set_default("sender.address", "noreply@localhost")?
            .set_default("templates.dir", "templates")?
            .set_default("retry.max_retries", 3)?
            .set_default("retry.base_delay_ms", 1000)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SMTP_HOST, SENDER_ADDRESS, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            starttls: default_starttls(),
            pool_max_size: default_pool_max_size(),
            pool_idle_timeout_seconds: default_pool_idle_timeout(),
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            name: default_sender_name(),
            address: default_sender_address(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}
