//! Server configuration loaded from the environment

use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

/// Runtime configuration for the presence server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Per-subscriber queue depth on the topic bus
    pub subscriber_buffer: usize,
    /// Maximum tables per event, main room included
    pub table_limit: usize,
    /// Table capacity when the creator gives none
    pub default_user_capacity: u32,
    /// Chat history page size
    pub chat_page_size: usize,
    /// SSE keep-alive interval
    pub keep_alive: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            subscriber_buffer: 256,
            table_limit: 16, // 15 + main room
            default_user_capacity: 10,
            chat_page_size: 20,
            keep_alive: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// Environment:
    /// - PRESENCE_HOST: Bind address (default 0.0.0.0)
    /// - PRESENCE_PORT: Bind port (default 4000)
    /// - PRESENCE_SUBSCRIBER_BUFFER: Queued payloads per subscriber (default 256)
    /// - PRESENCE_TABLE_LIMIT: Tables per event (default 16)
    /// - PRESENCE_DEFAULT_USER_CAPACITY: Default table capacity (default 10)
    /// - PRESENCE_CHAT_PAGE_SIZE: Chat messages per page (default 20)
    /// - PRESENCE_KEEPALIVE_SECS: SSE keep-alive seconds (default 30, at least 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("PRESENCE_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PRESENCE_PORT", defaults.port),
            subscriber_buffer: parse_or(&lookup, "PRESENCE_SUBSCRIBER_BUFFER", defaults.subscriber_buffer)
                .max(1),
            table_limit: parse_or(&lookup, "PRESENCE_TABLE_LIMIT", defaults.table_limit),
            default_user_capacity: parse_or(
                &lookup,
                "PRESENCE_DEFAULT_USER_CAPACITY",
                defaults.default_user_capacity,
            ),
            chat_page_size: parse_or(&lookup, "PRESENCE_CHAT_PAGE_SIZE", defaults.chat_page_size),
            keep_alive: Duration::from_secs(parse_or(
                &lookup,
                "PRESENCE_KEEPALIVE_SECS",
                defaults.keep_alive.as_secs(),
            )
            .max(1)),
        }
    }

    /// Socket address to bind, falling back to all interfaces
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}
