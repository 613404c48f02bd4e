//! Link lifecycle
//!
//! Opening a link configures the serial port and arms its notifications;
//! shutting it down releases the port. Both run outside any transaction.

use epos_hal::{OpenError, PortConfig, PortConfigError, SerialHost, SerialPort};
use epos_protocol::MAX_PAYLOAD;

use crate::config::{ConfigError, LinkConfig};
use crate::engine::Engine;

/// Errors from [`open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Port configuration rejected before opening
    Port(PortConfigError),
    /// Link configuration rejected before opening
    Config(ConfigError),
    /// Serial subsystem refused to open the port
    Open(OpenError),
    /// Port opened but notifications could not be armed
    Thresholds,
}

impl From<PortConfigError> for LinkError {
    fn from(e: PortConfigError) -> Self {
        LinkError::Port(e)
    }
}

impl From<ConfigError> for LinkError {
    fn from(e: ConfigError) -> Self {
        LinkError::Config(e)
    }
}

impl From<OpenError> for LinkError {
    fn from(e: OpenError) -> Self {
        LinkError::Open(e)
    }
}

/// Open the port and create an idle engine on it
///
/// On failure after the port was opened, the port is closed again.
pub fn open<H: SerialHost>(
    host: &mut H,
    port_config: &PortConfig,
    link_config: LinkConfig,
) -> Result<Engine<H::Port>, LinkError> {
    port_config.validate(MAX_PAYLOAD)?;
    link_config.validate()?;

    let mut port = host.open(port_config).map_err(|e| {
        match e {
            OpenError::NoDevice => error!("serial port number rejected"),
            OpenError::InvalidParameters => error!("invalid parameters for opening serial port"),
            OpenError::AddressInUse => error!("serial port already in use"),
        }
        LinkError::from(e)
    })?;

    if port.set_thresholds(1, 1).is_err() {
        error!("failed to arm serial port notifications");
        if host.close(port).is_err() {
            error!("failed to close serial port");
        }
        return Err(LinkError::Thresholds);
    }

    info!(
        "link open on port {} at {} baud",
        port_config.port,
        port_config.baudrate
    );
    Ok(Engine::new(port, link_config))
}

/// Release the port
///
/// The caller must make sure no transaction is in flight; an in-flight one
/// is dropped.
pub fn shutdown<H: SerialHost>(host: &mut H, engine: Engine<H::Port>) {
    if engine.state().is_busy() {
        warn!("shutting down with transaction in {}", engine.state());
    }
    if host.close(engine.into_port()).is_err() {
        error!("error closing serial port: port does not exist");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DriverState;
    use epos_hal::mock::MockHost;
    use epos_hal::{CloseError, FifoTrigger};

    #[test]
    fn test_open_and_shutdown() {
        let mut host = MockHost::new();
        let engine = open(&mut host, &PortConfig::default(), LinkConfig::default()).unwrap();

        assert_eq!(engine.state(), DriverState::Ready);
        assert_eq!(engine.port().tx_capacity(), 14);
        assert_eq!(engine.port().thresholds(), (1, 1));

        shutdown(&mut host, engine);
        assert_eq!(host.opened, 1);
        assert_eq!(host.closed, 1);
    }

    #[test]
    fn test_open_error() {
        let mut host = MockHost::new();
        host.open_error = Some(OpenError::NoDevice);
        let result = open(&mut host, &PortConfig::default(), LinkConfig::default());

        assert_eq!(result.err(), Some(LinkError::Open(OpenError::NoDevice)));
        assert_eq!(host.closed, 0);
    }

    #[test]
    fn test_threshold_failure_closes_port() {
        let mut host = MockHost::new();
        host.fail_thresholds = true;
        let result = open(&mut host, &PortConfig::default(), LinkConfig::default());

        assert_eq!(result.err(), Some(LinkError::Thresholds));
        assert_eq!(host.opened, 1);
        assert_eq!(host.closed, 1);
    }

    #[test]
    fn test_invalid_configs_never_open() {
        let mut host = MockHost::new();
        let small_fifo = PortConfig {
            fifo: FifoTrigger::Bytes8,
            ..PortConfig::default()
        };
        assert_eq!(
            open(&mut host, &small_fifo, LinkConfig::default()).err(),
            Some(LinkError::Port(PortConfigError::FifoTooSmall))
        );

        let zero_timeout = LinkConfig {
            response_timeout_ms: 0,
            ..LinkConfig::default()
        };
        assert_eq!(
            open(&mut host, &PortConfig::default(), zero_timeout).err(),
            Some(LinkError::Config(ConfigError::ZeroTimeout))
        );
        assert_eq!(host.opened, 0);
    }

    #[test]
    fn test_shutdown_close_error_is_logged_only() {
        let mut host = MockHost::new();
        host.close_error = Some(CloseError::NoDevice);
        let mut engine = open(&mut host, &PortConfig::default(), LinkConfig::default()).unwrap();
        assert!(engine.write_object(0x6040, 0, 1, 0x0F).is_admitted());

        shutdown(&mut host, engine);
        assert_eq!(host.closed, 1);
    }
}
