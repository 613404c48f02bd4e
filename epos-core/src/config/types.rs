//! Configuration type definitions
//!
//! With the `serde` feature the configuration can be persisted as
//! postcard-serialized binary data.

use epos_protocol::{AckBytes, RESPONSE_OPCODE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default transaction timeout
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 500;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Timeout of zero would abort every transaction immediately
    ZeroTimeout,
    /// Okay and fail acknowledgements share a wire value
    AckValuesEqual,
    /// Serialization failed (buffer too small)
    Encode,
    /// Stored bytes are not a valid configuration
    Decode,
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Acknowledgements the device sends for the opcode and data frame
    pub handshake_ack: AckBytes,
    /// Acknowledgements the host sends for the response
    pub response_ack: AckBytes,
    /// Opcode seeding the response checksum
    pub response_opcode: u8,
    /// Time allowed between state changes before a transaction is abandoned
    pub response_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            handshake_ack: AckBytes::DEFAULT,
            response_ack: AckBytes::DEFAULT,
            response_opcode: RESPONSE_OPCODE,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.handshake_ack.okay == self.handshake_ack.fail
            || self.response_ack.okay == self.response_ack.fail
        {
            return Err(ConfigError::AckValuesEqual);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.handshake_ack.okay, b'O');
        assert_eq!(config.handshake_ack.fail, b'F');
        assert_eq!(config.response_ack, AckBytes::DEFAULT);
        assert_eq!(config.response_opcode, 0x00);
        assert_eq!(config.response_timeout_ms, 500);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = LinkConfig {
            response_timeout_ms: 0,
            ..LinkConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_validate_rejects_equal_acks() {
        let config = LinkConfig {
            response_ack: AckBytes {
                okay: b'O',
                fail: b'O',
            },
            ..LinkConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AckValuesEqual));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let config = LinkConfig {
            response_timeout_ms: 1200,
            ..LinkConfig::default()
        };
        let mut buf = [0u8; 32];
        let used = config.to_slice(&mut buf).unwrap().len();

        assert_eq!(LinkConfig::from_bytes(&buf[..used]), Ok(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_errors() {
        let mut tiny = [0u8; 2];
        assert_eq!(
            LinkConfig::default().to_slice(&mut tiny).unwrap_err(),
            ConfigError::Encode
        );
        assert_eq!(LinkConfig::from_bytes(&[]), Err(ConfigError::Decode));
    }
}
