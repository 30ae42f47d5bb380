mod server;

pub use server::{DEFAULT_SESSION_TTL_DAYS, MAX_SESSION_TTL_DAYS, ServerConfig};
