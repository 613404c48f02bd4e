//! Property tests for frame checksums

use epos_protocol::{verify, FrameError, OutboundFrame, Request, Response, RESPONSE_OPCODE};
use proptest::prelude::*;

fn request() -> impl Strategy<Value = Request> {
    prop_oneof![
        (any::<u16>(), any::<u8>(), any::<u8>()).prop_map(|(index, sub_index, node_id)| {
            Request::ReadObject {
                index,
                sub_index,
                node_id,
            }
        }),
        (any::<u16>(), any::<u8>(), any::<u8>(), any::<u32>()).prop_map(
            |(index, sub_index, node_id, value)| Request::WriteObject {
                index,
                sub_index,
                node_id,
                value,
            }
        ),
    ]
}

proptest! {
    #[test]
    fn request_frame_verifies(request in request()) {
        let frame = request.to_frame().unwrap();
        let body = verify(request.opcode(), frame.as_bytes()).unwrap();
        prop_assert_eq!(body, &frame.as_bytes()[..frame.len() - 2]);
    }

    #[test]
    fn flipped_request_bit_fails(request in request(), bit in 0usize..(11 * 8)) {
        let frame = request.to_frame().unwrap();
        let mut bytes = [0u8; 16];
        let len = frame.len();
        bytes[..len].copy_from_slice(frame.as_bytes());

        let bit = bit % (len * 8);
        bytes[bit / 8] ^= 1 << (bit % 8);

        prop_assert_eq!(
            verify(request.opcode(), &bytes[..len]),
            Err(FrameError::ChecksumMismatch)
        );
    }

    #[test]
    fn response_roundtrip(payload in proptest::collection::vec(any::<u8>(), 0..=14)) {
        let response = Response::new(&payload).unwrap();
        let mut buffer = [0u8; 17];
        let len = response.encode(RESPONSE_OPCODE, &mut buffer).unwrap();

        let parsed = Response::decode(RESPONSE_OPCODE, buffer[0], &buffer[1..len]).unwrap();
        prop_assert_eq!(parsed.payload(), &payload[..]);
    }

    #[test]
    fn flipped_response_bit_fails(
        payload in proptest::collection::vec(any::<u8>(), 1..=14),
        bit in any::<usize>(),
    ) {
        let response = Response::new(&payload).unwrap();
        let mut buffer = [0u8; 17];
        let len = response.encode(RESPONSE_OPCODE, &mut buffer).unwrap();

        // Flip a payload or checksum bit, leaving the length byte alone
        let bit = bit % ((len - 1) * 8);
        buffer[1 + bit / 8] ^= 1 << (bit % 8);

        prop_assert_eq!(
            Response::decode(RESPONSE_OPCODE, buffer[0], &buffer[1..len]),
            Err(FrameError::ChecksumMismatch)
        );
    }

    #[test]
    fn oversized_body_rejected(body in proptest::collection::vec(any::<u8>(), 13..32)) {
        prop_assert_eq!(OutboundFrame::new(0x11, &body), Err(FrameError::PayloadTooLarge));
    }
}
