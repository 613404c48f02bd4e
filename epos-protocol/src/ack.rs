//! Handshake acknowledgement bytes
//!
//! Every stage of a transaction is confirmed by a single byte: the device
//! acknowledges the opcode and the data frame, the host acknowledges the
//! response.

#[cfg(feature = "defmt")]
use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// "Okay" acknowledgement on the wire
pub const ACK_OKAY: u8 = b'O';

/// "Fail" acknowledgement on the wire
pub const ACK_FAIL: u8 = b'F';

/// Interpreted acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Ack {
    /// Stage accepted
    Okay,
    /// Stage rejected (or an unrecognised byte)
    Fail,
}

/// Wire values for one acknowledgement stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AckBytes {
    pub okay: u8,
    pub fail: u8,
}

impl Default for AckBytes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AckBytes {
    /// `'O'` / `'F'`
    pub const DEFAULT: Self = Self {
        okay: ACK_OKAY,
        fail: ACK_FAIL,
    };

    /// Interpret a received byte
    ///
    /// Anything other than the okay value counts as a rejection.
    pub fn classify(&self, byte: u8) -> Ack {
        if byte == self.okay {
            Ack::Okay
        } else {
            Ack::Fail
        }
    }

    /// Wire byte for an acknowledgement
    pub fn byte(&self, ack: Ack) -> u8 {
        match ack {
            Ack::Okay => self.okay,
            Ack::Fail => self.fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let bytes = AckBytes::DEFAULT;
        assert_eq!(bytes.classify(b'O'), Ack::Okay);
        assert_eq!(bytes.classify(b'F'), Ack::Fail);
        assert_eq!(bytes.classify(0x00), Ack::Fail);
        assert_eq!(bytes.classify(b'o'), Ack::Fail);
    }

    #[test]
    fn test_byte() {
        let bytes = AckBytes {
            okay: 0xAA,
            fail: 0x55,
        };
        assert_eq!(bytes.byte(Ack::Okay), 0xAA);
        assert_eq!(bytes.byte(Ack::Fail), 0x55);
        assert_eq!(bytes.classify(0xAA), Ack::Okay);
    }
}
