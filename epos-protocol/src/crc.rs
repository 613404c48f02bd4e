//! CRC-CCITT checksum
//!
//! The EPOS checksum is the reflected CCITT polynomial (0x8408) with a zero
//! initial register and no final xor, i.e. CRC-16/KERMIT. Frames are
//! checksummed in two steps: the opcode byte is folded into a zero seed,
//! then the frame bytes are folded in starting from that result.

use crc::{Crc, CRC_16_KERMIT};

static CRC_CCITT: Crc<u16> = Crc::<u16>::new(&CRC_16_KERMIT);

/// Fold `bytes` into a running CRC-CCITT value
pub fn crc_ccitt(seed: u16, bytes: &[u8]) -> u16 {
    // The digest reflects its initial value on entry; pre-reflect so the
    // running register continues unchanged.
    let mut digest = CRC_CCITT.digest_with_initial(seed.reverse_bits());
    digest.update(bytes);
    digest.finalize()
}

/// Fold a single byte into a running CRC-CCITT value
pub fn crc_ccitt_byte(seed: u16, byte: u8) -> u16 {
    crc_ccitt(seed, &[byte])
}

/// Checksum of a frame sent or received under `opcode`
pub fn frame_checksum(opcode: u8, bytes: &[u8]) -> u16 {
    crc_ccitt(crc_ccitt_byte(0, opcode), bytes)
}
