//! State machine definition
//!
//! Every byte the engine sends or reads is a function of the current state
//! and the latest port notification.

use epos_protocol::Ack;

use super::events::Event;

/// Driver states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Idle, a new transaction may be admitted
    #[default]
    Ready,
    /// Opcode byte queued, waiting for it to leave the port
    SendingOpcode,
    /// Waiting for the device to accept the opcode
    WaitingBeginAck,
    /// Data frame queued, waiting for it to leave the port
    SendingData,
    /// Waiting for the device to accept the data frame
    WaitingEndAck,
    /// Waiting for the response length byte
    WaitingResponseLength,
    /// Waiting for the response payload and checksum
    WaitingResponseData,
    /// Response acknowledgement queued, waiting for it to leave the port
    SendingResponseAck,
}

impl DriverState {
    /// Check if a transaction is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self, DriverState::Ready)
    }

    /// Check if this state waits for the transmit FIFO to empty
    pub fn awaits_drain(&self) -> bool {
        matches!(
            self,
            DriverState::SendingOpcode | DriverState::SendingData | DriverState::SendingResponseAck
        )
    }

    /// Process an event and return the next state
    ///
    /// Pairs not listed leave the state unchanged.
    pub fn transition(self, event: Event) -> Self {
        use DriverState::*;
        use Event::*;

        match (self, event) {
            (Ready, Admitted) => SendingOpcode,

            (SendingOpcode, OpcodeDrained) => WaitingBeginAck,

            (WaitingBeginAck, BeginAck(Ack::Okay)) => SendingData,
            (WaitingBeginAck, BeginAck(Ack::Fail)) => Ready,

            (SendingData, FrameDrained) => WaitingEndAck,

            (WaitingEndAck, EndAck(Ack::Okay)) => WaitingResponseLength,
            (WaitingEndAck, EndAck(Ack::Fail)) => Ready,

            (WaitingResponseLength, LengthReceived) => WaitingResponseData,

            (WaitingResponseData, ResponseReceived) => SendingResponseAck,

            (SendingResponseAck, AckDrained) => Ready,

            // Any in-flight transaction can be torn down
            (_, Fault) => Ready,

            // Default: stay in current state
            _ => self,
        }
    }
}
