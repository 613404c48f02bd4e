//! EPOS Link Hardware Abstraction Layer
//!
//! This crate defines the serial transport traits the EPOS protocol engine
//! is written against. A platform (an RTOS serial driver, a Linux tty
//! wrapper, a test harness) implements them; the engine never touches the
//! hardware directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  epos-core (protocol engine)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  epos-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ platform      │       │ mock (tests)  │
//! │ serial driver │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPort`] - Non-blocking byte I/O with readiness notifications
//! - [`serial::SerialHost`] - Opening and closing ports
//!
//! The `mock` feature adds an in-memory port and host. The crate's own
//! tests enable it through a dev-dependency on itself.

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use serial::{
    CloseError, DataBits, FifoTrigger, Handshake, OpenError, Parity, PortConfig, PortConfigError,
    SerialHost, SerialPort, StopBits,
};
