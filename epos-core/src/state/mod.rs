//! Driver state machine
//!
//! The link is always in exactly one [`DriverState`]. Transitions are a
//! pure function of the current state and an [`Event`]; the engine decides
//! which event a port notification amounts to and performs the I/O.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::DriverState;
