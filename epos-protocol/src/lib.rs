//! EPOS RS-232 Object Protocol
//!
//! This crate defines the wire format spoken between the host and a Maxon
//! EPOS motor controller over a half-duplex serial link. A transaction is a
//! sequence of single-byte handshakes around two checksummed frames:
//!
//! ```text
//!  host                                   device
//!   │ ── OPCODE ─────────────────────────▶ │
//!   │ ◀──────────────────────────── ACK ── │
//!   │ ── LEN │ DATA... │ CRC ────────────▶ │
//!   │ ◀──────────────────────────── ACK ── │
//!   │ ◀───────────── LEN │ DATA... │ CRC ── │
//!   │ ── ACK ────────────────────────────▶ │
//! ```
//!
//! Multi-byte fields are little-endian. The checksum is CRC-CCITT seeded
//! with the frame's opcode.

#![no_std]
#![deny(unsafe_code)]

pub mod ack;
pub mod crc;
pub mod frame;
pub mod request;
pub mod response;

pub use ack::{Ack, AckBytes, ACK_FAIL, ACK_OKAY};
pub use crc::{crc_ccitt, crc_ccitt_byte, frame_checksum};
pub use frame::{verify, FrameError, OutboundFrame, CHECKSUM_LEN, MAX_PAYLOAD};
pub use request::{Request, OPCODE_READ_OBJECT, OPCODE_WRITE_OBJECT};
pub use response::{body_len, Response, RESPONSE_OPCODE};
