use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
/// Upper bound for `session_ttl_days` (about a hundred years).
pub const MAX_SESSION_TTL_DAYS: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Lifetime of a session issued at sign-in. Zero means sessions never expire.
    pub session_ttl_days: i64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("recipebox.db")
    }

    pub fn session_ttl(&self) -> Result<Option<Duration>> {
        match self.session_ttl_days {
            0 => Ok(None),
            days @ 1..=MAX_SESSION_TTL_DAYS => Ok(Duration::try_days(days)),
            days => Err(Error::Config(format!(
                "session TTL must be between 0 and {MAX_SESSION_TTL_DAYS} days, got {days}"
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
        }
    }
}
