//! Chat server configuration
//!
//! Provides `ChatConfig`, built either from the environment or through
//! `ChatConfigBuilder`.

use thiserror::Error;

/// Port used when `SERVER_PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;
/// Default upper bound on a message body, in bytes
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 10_000;
/// Default upper bound on attachment references per message
pub const DEFAULT_MAX_ATTACHMENTS: usize = 10;

const DEVELOPMENT_JWT_SECRET: &str = "xfchat-development-secret-change-me";

/// Chat server configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Port the HTTP/WebSocket server binds to
    pub port: u16,
    /// PostgreSQL URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// HS256 secret for handshake tokens
    pub jwt_secret: String,
    pub max_message_length: usize,
    pub max_attachments: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            max_attachments: DEFAULT_MAX_ATTACHMENTS,
        }
    }
}

impl ChatConfig {
    /// Create a new ChatConfigBuilder
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Reads `SERVER_PORT`, `DATABASE_URL`, `JWT_SECRET`,
    /// `MAX_MESSAGE_LENGTH` and `MAX_ATTACHMENTS`. Unset values fall back to
    /// defaults; values that are set but malformed are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(port) = lookup("SERVER_PORT") {
            builder = builder.port(parse_number("SERVER_PORT", &port)?);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => {
                tracing::warn!("[Config] JWT_SECRET not set, using the development secret");
            }
        }
        if let Some(len) = lookup("MAX_MESSAGE_LENGTH") {
            builder = builder.max_message_length(parse_number("MAX_MESSAGE_LENGTH", &len)?);
        }
        if let Some(count) = lookup("MAX_ATTACHMENTS") {
            builder = builder.max_attachments(parse_number("MAX_ATTACHMENTS", &count)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.max_message_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_MESSAGE_LENGTH",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Builder for ChatConfig
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    max_message_length: Option<usize>,
    max_attachments: Option<usize>,
}

impl ChatConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn max_message_length(mut self, len: usize) -> Self {
        self.max_message_length = Some(len);
        self
    }

    pub fn max_attachments(mut self, count: usize) -> Self {
        self.max_attachments = Some(count);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ChatConfig, ConfigError> {
        let defaults = ChatConfig::default();
        let config = ChatConfig {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url,
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            max_message_length: self.max_message_length.unwrap_or(defaults.max_message_length),
            max_attachments: self.max_attachments.unwrap_or(defaults.max_attachments),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
