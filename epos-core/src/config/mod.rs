//! Link configuration
//!
//! Handshake byte values, the response opcode and the transaction timeout.

pub mod types;

pub use types::{ConfigError, LinkConfig, DEFAULT_RESPONSE_TIMEOUT_MS};
