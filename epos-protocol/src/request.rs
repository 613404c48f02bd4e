//! Request kinds for the EPOS object protocol
//!
//! Object dictionary access is the only service the link carries: write a
//! 32-bit value to an object, or read one back.

use crate::frame::{FrameError, OutboundFrame};

/// Opcode: read object
pub const OPCODE_READ_OBJECT: u8 = 0x10;
/// Opcode: write object
pub const OPCODE_WRITE_OBJECT: u8 = 0x11;

/// A request descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Read an object value
    ReadObject {
        index: u16,
        sub_index: u8,
        node_id: u8,
    },
    /// Write an object value
    WriteObject {
        index: u16,
        sub_index: u8,
        node_id: u8,
        value: u32,
    },
}

impl Request {
    /// Opcode sent ahead of the frame
    pub fn opcode(&self) -> u8 {
        match self {
            Request::ReadObject { .. } => OPCODE_READ_OBJECT,
            Request::WriteObject { .. } => OPCODE_WRITE_OBJECT,
        }
    }

    /// Encode the request frame
    pub fn to_frame(&self) -> Result<OutboundFrame, FrameError> {
        match *self {
            Request::ReadObject {
                index,
                sub_index,
                node_id,
            } => {
                // Payload: [len][index lo][index hi][sub][node]
                let [lo, hi] = index.to_le_bytes();
                let body = [words_minus_one(4), lo, hi, sub_index, node_id];
                OutboundFrame::new(OPCODE_READ_OBJECT, &body)
            }
            Request::WriteObject {
                index,
                sub_index,
                node_id,
                value,
            } => {
                // Payload: [len][index lo][index hi][sub][node][value LE x4]
                let [lo, hi] = index.to_le_bytes();
                let [v0, v1, v2, v3] = value.to_le_bytes();
                let body = [
                    words_minus_one(8),
                    lo,
                    hi,
                    sub_index,
                    node_id,
                    v0,
                    v1,
                    v2,
                    v3,
                ];
                OutboundFrame::new(OPCODE_WRITE_OBJECT, &body)
            }
        }
    }
}

/// Length byte for `data_len` bytes of request data
const fn words_minus_one(data_len: usize) -> u8 {
    (data_len / 2 - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::{crc_ccitt, crc_ccitt_byte};

    #[test]
    fn test_write_object_frame() {
        let request = Request::WriteObject {
            index: 0x6040,
            sub_index: 0,
            node_id: 1,
            value: 0x0F,
        };
        let frame = request.to_frame().unwrap();
        let bytes = frame.as_bytes();

        let crc = crc_ccitt(crc_ccitt_byte(0, 0x11), &bytes[..9]);
        let [crc_lo, crc_hi] = crc.to_le_bytes();
        assert_eq!(
            bytes,
            &[0x03, 0x40, 0x60, 0x00, 0x01, 0x0F, 0x00, 0x00, 0x00, crc_lo, crc_hi]
        );
        assert_eq!(&bytes[9..], &[0xBB, 0x50]);
        assert_eq!(frame.opcode(), OPCODE_WRITE_OBJECT);
    }

    #[test]
    fn test_write_object_value_little_endian() {
        let request = Request::WriteObject {
            index: 0x607A,
            sub_index: 0x02,
            node_id: 7,
            value: 0x1234_5678,
        };
        let frame = request.to_frame().unwrap();
        assert_eq!(
            &frame.as_bytes()[..9],
            &[0x03, 0x7A, 0x60, 0x02, 0x07, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn test_read_object_frame() {
        let request = Request::ReadObject {
            index: 0x6040,
            sub_index: 0,
            node_id: 1,
        };
        let frame = request.to_frame().unwrap();
        assert_eq!(frame.len(), 7);
        assert_eq!(
            frame.as_bytes(),
            &[0x01, 0x40, 0x60, 0x00, 0x01, 0x87, 0x4B]
        );
        assert_eq!(request.opcode(), OPCODE_READ_OBJECT);
    }
}
