//! Protocol engine
//!
//! Owns the driver state, both frame buffers and the outcome slot. Two
//! entry points mutate it:
//!
//! - [`Engine::submit`] admits a transaction when the link is idle and
//!   queues its opcode byte. It never waits for the device.
//! - [`Engine::on_port_event`] is called by the platform whenever the
//!   readable or transmit-free byte count of the port changes. Every other
//!   step of the transaction happens here.
//!
//! Callers must serialize these calls; see [`crate::shared::SharedEngine`].

use heapless::Vec;

use epos_hal::SerialPort;
use epos_protocol::{body_len, Ack, OutboundFrame, Request, Response, CHECKSUM_LEN, MAX_PAYLOAD};

use crate::config::LinkConfig;
use crate::outcome::{AdmissionResult, Outcome, RejectStage};
use crate::state::{DriverState, Event};
use crate::watchdog::Watchdog;

/// Capacity of the inbound buffer (payload plus checksum)
pub const INBOUND_CAPACITY: usize = MAX_PAYLOAD + CHECKSUM_LEN;

/// EPOS protocol engine for one serial port
pub struct Engine<P> {
    port: P,
    config: LinkConfig,
    state: DriverState,
    /// Frame of the current (or last) transaction
    outbound: Option<OutboundFrame>,
    /// Response payload and checksum as read from the port
    inbound: Vec<u8, INBOUND_CAPACITY>,
    /// Declared response payload length
    response_len: u8,
    outcome: Option<Outcome>,
    watchdog: Watchdog,
}

impl<P: SerialPort> Engine<P> {
    /// Create an idle engine on an opened port
    pub fn new(port: P, config: LinkConfig) -> Self {
        Self {
            port,
            watchdog: Watchdog::new(config.response_timeout_ms),
            config,
            state: DriverState::Ready,
            outbound: None,
            inbound: Vec::new(),
            response_len: 0,
            outcome: None,
        }
    }

    /// Current driver state
    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Release the port
    pub fn into_port(self) -> P {
        self.port
    }

    /// Frame of the current or most recent transaction
    pub fn outbound_frame(&self) -> &[u8] {
        match &self.outbound {
            Some(frame) => frame.as_bytes(),
            None => &[],
        }
    }

    /// Outcome of the most recent finished transaction
    ///
    /// Cleared when the next transaction is admitted.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Take the outcome of the most recent finished transaction
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    /// Start writing an object
    pub fn write_object(
        &mut self,
        index: u16,
        sub_index: u8,
        node_id: u8,
        value: u32,
    ) -> AdmissionResult {
        self.submit(Request::WriteObject {
            index,
            sub_index,
            node_id,
            value,
        })
    }

    /// Start reading an object
    pub fn read_object(&mut self, index: u16, sub_index: u8, node_id: u8) -> AdmissionResult {
        self.submit(Request::ReadObject {
            index,
            sub_index,
            node_id,
        })
    }

    /// Admit a transaction
    ///
    /// Returns immediately. The frame is built now and sent once the
    /// device accepts the opcode; the outcome shows up in
    /// [`Engine::last_outcome`] when the link is ready again.
    pub fn submit(&mut self, request: Request) -> AdmissionResult {
        if self.state.is_busy() {
            debug!("submit refused, link busy in {}", self.state);
            return AdmissionResult::Busy;
        }

        let frame = match request.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("failed to encode request: {}", e);
                return AdmissionResult::UnexpectedError;
            }
        };

        // Late bytes from an abandoned transaction would pose as the begin ack
        let stale = self.flush_rx();
        if stale > 0 {
            debug!("dropped {} stale bytes before admission", stale);
        }

        match self.port.write(&[frame.opcode()]) {
            Ok(0) => {}
            Ok(1) => {
                debug!("submit refused, transmit buffer full");
                return AdmissionResult::PortBufferFull;
            }
            _ => {
                warn!("opcode write failed");
                return AdmissionResult::UnexpectedError;
            }
        }

        trace!("admitted {}", request);
        self.outbound = Some(frame);
        self.inbound.clear();
        self.outcome = None;
        self.apply(Event::Admitted);
        AdmissionResult::Admitted
    }

    /// Port notification: `rx_available` bytes readable, `tx_free` bytes of
    /// transmit FIFO free
    ///
    /// Counts that do not satisfy the current state's condition are ignored.
    pub fn on_port_event(&mut self, rx_available: usize, tx_free: usize) {
        let mut rx_available = rx_available;
        let mut tx_free = tx_free;

        // Bytes that arrived alongside a transition must still be
        // processed; the port will not notify again for them.
        loop {
            let before = self.state;
            self.step(&mut rx_available, &mut tx_free);
            if self.state == before {
                break;
            }
        }
    }

    /// Advance the watchdog
    ///
    /// Abandons the in-flight transaction with [`Outcome::Timeout`] once
    /// the configured time passes without a state change.
    pub fn tick(&mut self, delta_ms: u32) {
        if !self.state.is_busy() {
            return;
        }
        if self.watchdog.update(delta_ms) {
            warn!(
                "no progress in {} for {} ms, abandoning transaction",
                self.state,
                self.watchdog.elapsed_ms()
            );
            self.abandon(Outcome::Timeout);
        }
    }

    /// Abandon the in-flight transaction
    ///
    /// Returns false if the link was already idle.
    pub fn abort(&mut self) -> bool {
        if !self.state.is_busy() {
            return false;
        }
        info!("transaction cancelled in {}", self.state);
        self.abandon(Outcome::Cancelled);
        true
    }

    fn step(&mut self, rx_available: &mut usize, tx_free: &mut usize) {
        if self.state.awaits_drain() {
            if *tx_free == self.port.tx_capacity() {
                self.on_drained();
            }
            return;
        }

        match self.state {
            DriverState::WaitingBeginAck if *rx_available == 1 => {
                if let Some(byte) = self.read_one(rx_available) {
                    self.on_begin_ack(byte, tx_free);
                }
            }
            DriverState::WaitingEndAck if *rx_available >= 1 => {
                if let Some(byte) = self.read_one(rx_available) {
                    self.on_end_ack(byte);
                }
            }
            DriverState::WaitingResponseLength if *rx_available >= 1 => {
                if let Some(byte) = self.read_one(rx_available) {
                    self.on_response_len(byte, rx_available);
                }
            }
            DriverState::WaitingResponseData
                if *rx_available >= self.response_len as usize + CHECKSUM_LEN =>
            {
                self.on_response_body(rx_available, tx_free);
            }
            _ => {}
        }
    }

    fn on_drained(&mut self) {
        let event = match self.state {
            DriverState::SendingOpcode => Event::OpcodeDrained,
            DriverState::SendingData => Event::FrameDrained,
            _ => Event::AckDrained,
        };
        self.apply(event);
        if !self.state.is_busy() {
            self.restore_thresholds();
        }
    }

    fn on_begin_ack(&mut self, byte: u8, tx_free: &mut usize) {
        match self.config.handshake_ack.classify(byte) {
            Ack::Okay => match self.send_frame() {
                Some(written) => {
                    *tx_free = tx_free.saturating_sub(written);
                    self.apply(Event::BeginAck(Ack::Okay));
                }
                None => self.abandon(Outcome::PortFailure),
            },
            Ack::Fail => {
                warn!("device rejected opcode (ack {=u8:#x})", byte);
                self.apply(Event::BeginAck(Ack::Fail));
                self.settle(Outcome::Rejected(RejectStage::BeginAck));
            }
        }
    }

    fn on_end_ack(&mut self, byte: u8) {
        match self.config.handshake_ack.classify(byte) {
            Ack::Okay => self.apply(Event::EndAck(Ack::Okay)),
            Ack::Fail => {
                warn!("device rejected frame (ack {=u8:#x})", byte);
                self.apply(Event::EndAck(Ack::Fail));
                self.settle(Outcome::Rejected(RejectStage::EndAck));
            }
        }
    }

    fn on_response_len(&mut self, length: u8, rx_available: &mut usize) {
        match body_len(length) {
            Ok(remaining) => {
                self.response_len = length;
                self.inbound.clear();
                if self.port.set_thresholds(remaining, 1).is_err() {
                    warn!("failed to set receive threshold");
                }
                self.apply(Event::LengthReceived);
            }
            Err(e) => {
                warn!("response length {} out of bounds", length);
                self.flush_rx();
                *rx_available = 0;
                self.abandon(Outcome::Framing(e));
            }
        }
    }

    fn on_response_body(&mut self, rx_available: &mut usize, tx_free: &mut usize) {
        let expected = self.response_len as usize + CHECKSUM_LEN;
        let mut body = [0u8; INBOUND_CAPACITY];
        let read = match self.port.read(&mut body[..expected]) {
            Ok(n) => n,
            Err(_) => {
                self.abandon(Outcome::PortFailure);
                return;
            }
        };
        *rx_available = rx_available.saturating_sub(read);
        if read < expected {
            warn!("short response read: {} of {}", read, expected);
            self.abandon(Outcome::PortFailure);
            return;
        }

        self.inbound.clear();
        // Cannot overflow: expected <= INBOUND_CAPACITY
        let _ = self.inbound.extend_from_slice(&body[..expected]);

        match Response::decode(self.config.response_opcode, self.response_len, &self.inbound) {
            Ok(response) => {
                let ack = self.config.response_ack.byte(Ack::Okay);
                match self.port.write(&[ack]) {
                    Ok(0) => {
                        *tx_free = tx_free.saturating_sub(1);
                        trace!("response received: {} bytes", self.response_len);
                        self.outcome = Some(Outcome::Completed(response));
                        self.apply(Event::ResponseReceived);
                    }
                    _ => self.abandon(Outcome::PortFailure),
                }
            }
            Err(e) => {
                warn!("response rejected: {}", e);
                // Best effort: tell the device the response was corrupt
                let nack = self.config.response_ack.byte(Ack::Fail);
                if !matches!(self.port.write(&[nack]), Ok(0)) {
                    warn!("failed to send response nack");
                }
                self.abandon(Outcome::Framing(e));
            }
        }
    }

    /// Queue the outbound frame, returning the number of bytes written
    fn send_frame(&mut self) -> Option<usize> {
        let frame = self.outbound.as_ref()?;
        let len = frame.len();
        if self.port.set_thresholds(1, len).is_err() {
            warn!("failed to set transmit threshold");
        }
        match self.port.write(frame.as_bytes()) {
            Ok(0) => Some(len),
            Ok(not_written) => {
                warn!("frame write truncated, {} bytes not written", not_written);
                None
            }
            Err(_) => {
                warn!("frame write failed");
                None
            }
        }
    }

    fn read_one(&mut self, rx_available: &mut usize) -> Option<u8> {
        match self.port.read_byte() {
            Ok(Some(byte)) => {
                *rx_available -= 1;
                Some(byte)
            }
            Ok(None) => None,
            Err(_) => {
                warn!("port read failed in {}", self.state);
                self.abandon(Outcome::PortFailure);
                None
            }
        }
    }

    /// Read and drop everything the port holds, returning the count
    fn flush_rx(&mut self) -> usize {
        let mut scratch = [0u8; INBOUND_CAPACITY];
        let mut dropped = 0;
        loop {
            match self.port.read(&mut scratch) {
                Ok(0) | Err(_) => return dropped,
                Ok(n) => dropped += n,
            }
        }
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            trace!("{} -> {} on {}", self.state, next, event);
            self.state = next;
            self.watchdog.feed();
        }
    }

    /// Tear down the in-flight transaction
    fn abandon(&mut self, outcome: Outcome) {
        self.apply(Event::Fault);
        self.settle(outcome);
    }

    /// Record how the transaction ended once back in `Ready`
    fn settle(&mut self, outcome: Outcome) {
        debug!("transaction ended: {}", outcome);
        self.outcome = Some(outcome);
        self.restore_thresholds();
    }

    fn restore_thresholds(&mut self) {
        if self.port.set_thresholds(1, 1).is_err() {
            warn!("failed to restore notification thresholds");
        }
    }
}
