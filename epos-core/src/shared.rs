//! Interrupt-safe shared engine
//!
//! The Transaction API runs in the foreground while port notifications
//! arrive from the serial driver's interrupt or callback context. Wrapping
//! the engine in a critical-section mutex keeps an admission (opcode write
//! plus state change) from interleaving with a notification mid-transition.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use epos_hal::SerialPort;
use epos_protocol::Request;

use crate::engine::Engine;
use crate::outcome::{AdmissionResult, Outcome};
use crate::state::DriverState;

/// Engine behind a critical-section mutex
pub struct SharedEngine<P> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Engine<P>>>,
}

impl<P> SharedEngine<P> {
    /// Wrap an engine
    ///
    /// This is a const fn, allowing static initialization.
    pub const fn new(engine: Engine<P>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Unwrap the engine
    pub fn into_inner(self) -> Engine<P> {
        self.inner.into_inner().into_inner()
    }
}

impl<P: SerialPort> SharedEngine<P> {
    /// Run `f` with exclusive access to the engine
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Engine<P>) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`Engine::submit`]
    pub fn submit(&self, request: Request) -> AdmissionResult {
        self.with(|engine| engine.submit(request))
    }

    /// See [`Engine::on_port_event`]
    pub fn on_port_event(&self, rx_available: usize, tx_free: usize) {
        self.with(|engine| engine.on_port_event(rx_available, tx_free))
    }

    /// See [`Engine::tick`]
    pub fn tick(&self, delta_ms: u32) {
        self.with(|engine| engine.tick(delta_ms))
    }

    /// See [`Engine::abort`]
    pub fn abort(&self) -> bool {
        self.with(|engine| engine.abort())
    }

    pub fn state(&self) -> DriverState {
        self.with(|engine| engine.state())
    }

    /// See [`Engine::take_outcome`]
    pub fn take_outcome(&self) -> Option<Outcome> {
        self.with(|engine| engine.take_outcome())
    }
}
