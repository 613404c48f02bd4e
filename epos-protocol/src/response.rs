//! Device response frames
//!
//! The device answers every accepted request with
//! `[LENGTH][PAYLOAD...][CRC lo][CRC hi]`, checksummed under
//! [`RESPONSE_OPCODE`]. The payload starts with the device's 32-bit
//! communication error code; a read additionally carries the object value.

use heapless::Vec;

use crate::crc::frame_checksum;
use crate::frame::{FrameError, CHECKSUM_LEN, MAX_PAYLOAD};

/// Opcode the device answers under
pub const RESPONSE_OPCODE: u8 = 0x00;

/// A validated response
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    payload: Vec<u8, MAX_PAYLOAD>,
}

/// Check a received length byte
///
/// Returns the number of bytes (payload and checksum) still to be read.
pub fn body_len(length: u8) -> Result<usize, FrameError> {
    let length = length as usize;
    if length > MAX_PAYLOAD {
        return Err(FrameError::LengthTooLarge);
    }
    Ok(length + CHECKSUM_LEN)
}

impl Response {
    /// Create a response from a raw payload
    pub fn new(payload: &[u8]) -> Result<Self, FrameError> {
        let mut vec = Vec::new();
        vec.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { payload: vec })
    }

    /// Validate and unpack a response
    ///
    /// `body` holds the payload followed by the two checksum bytes, exactly
    /// as read after the length byte.
    pub fn decode(opcode: u8, length: u8, body: &[u8]) -> Result<Self, FrameError> {
        let expected = body_len(length)?;
        if body.len() < expected {
            return Err(FrameError::Incomplete);
        }

        let (payload, crc) = body[..expected].split_at(length as usize);
        let received = u16::from_le_bytes([crc[0], crc[1]]);

        let mut digest_input: Vec<u8, { MAX_PAYLOAD + 1 }> = Vec::new();
        digest_input
            .push(length)
            .map_err(|_| FrameError::LengthTooLarge)?;
        digest_input
            .extend_from_slice(payload)
            .map_err(|_| FrameError::LengthTooLarge)?;

        if received != frame_checksum(opcode, &digest_input) {
            return Err(FrameError::ChecksumMismatch);
        }

        Self::new(payload)
    }

    /// Encode this response as the device would send it
    ///
    /// Returns the number of bytes written (length byte, payload, checksum).
    pub fn encode(&self, opcode: u8, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.payload.len();
        let frame_len = 1 + len + CHECKSUM_LEN;
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = len as u8;
        buffer[1..1 + len].copy_from_slice(&self.payload);
        let crc = frame_checksum(opcode, &buffer[..1 + len]);
        buffer[1 + len..frame_len].copy_from_slice(&crc.to_le_bytes());

        Ok(frame_len)
    }

    /// Raw payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Device communication error code (0 = success)
    pub fn error_code(&self) -> Option<u32> {
        self.word(0)
    }

    /// Object value carried by a read response
    pub fn value(&self) -> Option<u32> {
        self.word(4)
    }

    /// True if the device reported no error
    pub fn is_success(&self) -> bool {
        self.error_code() == Some(0)
    }

    fn word(&self, offset: usize) -> Option<u32> {
        let bytes = self.payload.get(offset..offset + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
