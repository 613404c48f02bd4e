//! Protocol engine for Maxon EPOS motor controllers
//!
//! This crate turns a non-blocking, notification-driven serial port into a
//! request/response channel for EPOS object reads and writes:
//!
//! - Driver state machine (one transaction in flight, no queuing)
//! - Port notification handling that advances the handshake
//! - Transaction admission with explicit busy/error results
//! - Transaction watchdog
//! - Link configuration and lifecycle
//!
//! Nothing here blocks. [`Engine::submit`] returns as soon as the opcode is
//! queued; every later step runs from [`Engine::on_port_event`].

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod link;
pub mod outcome;
pub mod shared;
pub mod state;
pub mod watchdog;

pub use config::{ConfigError, LinkConfig};
pub use engine::Engine;
pub use link::LinkError;
pub use outcome::{AdmissionResult, Outcome, RejectStage};
pub use shared::SharedEngine;
pub use state::{DriverState, Event};
