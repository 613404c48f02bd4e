//! Events that trigger state transitions

use epos_protocol::Ack;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Transaction API
    /// Opcode byte queued for a new transaction
    Admitted,

    // Transmit drain events
    /// Opcode byte left the port
    OpcodeDrained,
    /// Data frame left the port
    FrameDrained,
    /// Response acknowledgement left the port
    AckDrained,

    // Receive events
    /// Device answered the opcode
    BeginAck(Ack),
    /// Device answered the data frame
    EndAck(Ack),
    /// Response length byte read and within bounds
    LengthReceived,
    /// Response body read, validated and acknowledged
    ResponseReceived,

    // Abort events
    /// Framing error, port failure, timeout or cancellation
    Fault,
}
