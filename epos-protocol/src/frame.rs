//! Frame encoding and validation for the EPOS object protocol.
//!
//! Frame format (the opcode travels separately, ahead of the frame):
//! - LENGTH (1 byte): request frames carry the data length in 16-bit words
//!   minus one, response frames the payload length in bytes
//! - DATA (variable): little-endian fields
//! - CHECKSUM (2 bytes, little-endian): CRC-CCITT over OPCODE, LENGTH and DATA

use heapless::Vec;

use crate::crc::frame_checksum;

/// Largest frame the link carries, bounded by the serial FIFO
pub const MAX_PAYLOAD: usize = 14;

/// Size of the trailing checksum
pub const CHECKSUM_LEN: usize = 2;

/// Errors that can occur during frame encoding or validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame would not fit in [`MAX_PAYLOAD`] bytes
    PayloadTooLarge,
    /// Received length byte exceeds [`MAX_PAYLOAD`]
    LengthTooLarge,
    /// Checksum mismatch
    ChecksumMismatch,
    /// Frame is shorter than its length byte declares
    Incomplete,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A checksummed frame ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutboundFrame {
    opcode: u8,
    bytes: Vec<u8, MAX_PAYLOAD>,
}

impl OutboundFrame {
    /// Build a frame from its body (length byte and data) and append the checksum
    pub fn new(opcode: u8, body: &[u8]) -> Result<Self, FrameError> {
        if body.len() + CHECKSUM_LEN > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut bytes = Vec::new();
        bytes
            .extend_from_slice(body)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        bytes
            .extend_from_slice(&frame_checksum(opcode, body).to_le_bytes())
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self { opcode, bytes })
    }

    /// Opcode sent ahead of this frame
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Frame bytes including the checksum
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Stored checksum value
    pub fn checksum(&self) -> u16 {
        let n = self.bytes.len();
        u16::from_le_bytes([self.bytes[n - 2], self.bytes[n - 1]])
    }
}

/// Validate a checksummed frame received or sent under `opcode`
///
/// Returns the frame body without the trailing checksum.
pub fn verify(opcode: u8, frame: &[u8]) -> Result<&[u8], FrameError> {
    if frame.len() < CHECKSUM_LEN {
        return Err(FrameError::Incomplete);
    }
    let (body, crc) = frame.split_at(frame.len() - CHECKSUM_LEN);
    let received = u16::from_le_bytes([crc[0], crc[1]]);
    if received != frame_checksum(opcode, body) {
        return Err(FrameError::ChecksumMismatch);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_appends_checksum() {
        let frame = OutboundFrame::new(0x11, &[3, 0x40, 0x60, 0, 1, 0x0F, 0, 0, 0]).unwrap();
        assert_eq!(frame.len(), 11);
        assert_eq!(frame.opcode(), 0x11);
        assert_eq!(frame.checksum(), 0x50BB);
        assert_eq!(&frame.as_bytes()[9..], &[0xBB, 0x50]);
    }

    #[test]
    fn test_verify_roundtrip() {
        let body = [1, 0x41, 0x60, 0, 1];
        let frame = OutboundFrame::new(0x10, &body).unwrap();
        assert_eq!(verify(0x10, frame.as_bytes()), Ok(&body[..]));
    }

    #[test]
    fn test_verify_wrong_opcode() {
        let frame = OutboundFrame::new(0x10, &[1, 2, 3]).unwrap();
        assert_eq!(
            verify(0x11, frame.as_bytes()),
            Err(FrameError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_verify_short_frame() {
        assert_eq!(verify(0x11, &[0xAB]), Err(FrameError::Incomplete));
    }

    #[test]
    fn test_payload_too_large() {
        let body = [0u8; MAX_PAYLOAD - 1];
        assert_eq!(
            OutboundFrame::new(0x11, &body),
            Err(FrameError::PayloadTooLarge)
        );
        assert!(OutboundFrame::new(0x11, &[0u8; MAX_PAYLOAD - CHECKSUM_LEN]).is_ok());
    }
}
