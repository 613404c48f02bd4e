//! Admission results and transaction outcomes

use epos_protocol::{FrameError, Response};

/// Result of asking the engine to start a transaction
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdmissionResult {
    /// Opcode queued, transaction in flight
    Admitted,
    /// Transmit FIFO could not take the opcode byte
    PortBufferFull,
    /// Another transaction is in flight
    Busy,
    /// Port failed for another reason
    UnexpectedError,
}

impl AdmissionResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionResult::Admitted)
    }
}

/// Handshake stage at which the device refused a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectStage {
    /// Opcode refused
    BeginAck,
    /// Data frame refused
    EndAck,
}

/// How the most recent transaction ended
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Response validated and acknowledged
    Completed(Response),
    /// Device answered "fail"
    Rejected(RejectStage),
    /// Response length out of bounds or checksum mismatch
    Framing(FrameError),
    /// Port failed a read or write mid-transaction
    PortFailure,
    /// No progress within the configured timeout
    Timeout,
    /// Aborted by the caller
    Cancelled,
}

impl Outcome {
    /// The response, if the transaction completed
    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Completed(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admitted() {
        assert!(AdmissionResult::Admitted.is_admitted());
        assert!(!AdmissionResult::Busy.is_admitted());
        assert!(!AdmissionResult::PortBufferFull.is_admitted());
        assert!(!AdmissionResult::UnexpectedError.is_admitted());
    }

    #[test]
    fn test_response_accessor() {
        let response = Response::new(&[0, 0, 0, 0]).unwrap();
        let outcome = Outcome::Completed(response.clone());
        assert!(outcome.is_completed());
        assert_eq!(outcome.response(), Some(&response));

        let rejected = Outcome::Rejected(RejectStage::EndAck);
        assert!(!rejected.is_completed());
        assert_eq!(rejected.response(), None);
    }
}
