//! Serial port abstractions
//!
//! The port is non-blocking: writes queue as much as fits in the transmit
//! FIFO and report the remainder, reads only return bytes that are already
//! buffered. Progress is signalled by the platform calling the protocol
//! engine with the current (readable, transmit-free) byte counts.

/// Non-blocking serial port
pub trait SerialPort {
    /// Error type for port operations
    type Error;

    /// Queue `data` for transmission
    ///
    /// Never blocks. Returns the number of bytes that did *not* fit in the
    /// transmit buffer (0 means everything was queued).
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` already-received bytes
    ///
    /// Returns the number of bytes copied into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Size of the transmit FIFO
    ///
    /// A notification reporting this many free bytes means everything
    /// written so far has left the port.
    fn tx_capacity(&self) -> usize;

    /// Set the notification thresholds
    ///
    /// The platform notifies once at least `rx` bytes are readable or at
    /// least `tx` bytes of transmit space are free.
    fn set_thresholds(&mut self, rx: usize, tx: usize) -> Result<(), Self::Error> {
        let _ = (rx, tx);
        Ok(())
    }

    /// Read a single byte, if one is buffered
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        let n = self.read(&mut buf)?;
        Ok(if n == 1 { Some(buf[0]) } else { None })
    }
}

/// Serial subsystem that owns the physical ports
pub trait SerialHost {
    /// Port handle produced by [`SerialHost::open`]
    type Port: SerialPort;

    /// Open and configure a port
    fn open(&mut self, config: &PortConfig) -> Result<Self::Port, OpenError>;

    /// Close a previously opened port
    fn close(&mut self, port: Self::Port) -> Result<(), CloseError>;
}

/// Errors from [`SerialHost::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenError {
    /// Port number not registered with the serial subsystem
    NoDevice,
    /// Line parameters rejected
    InvalidParameters,
    /// Port already opened by someone else
    AddressInUse,
}

/// Errors from [`SerialHost::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CloseError {
    /// Serial subsystem claims the port does not exist
    NoDevice,
}

/// Port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortConfig {
    /// Serial subsystem port number
    pub port: u8,
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per frame
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Flow control
    pub handshake: Handshake,
    /// Hardware FIFO trigger level
    pub fifo: FifoTrigger,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port: 0,
            baudrate: 38_400,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            handshake: Handshake::None,
            fifo: FifoTrigger::Bytes14,
        }
    }
}

/// Port configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortConfigError {
    /// Baud rate of zero
    InvalidBaud,
    /// FIFO cannot hold the largest frame
    FifoTooSmall,
}

impl PortConfig {
    /// Check the configuration against the largest frame the caller sends
    pub fn validate(&self, max_frame: usize) -> Result<(), PortConfigError> {
        if self.baudrate == 0 {
            return Err(PortConfigError::InvalidBaud);
        }
        if self.fifo.bytes() < max_frame {
            return Err(PortConfigError::FifoTooSmall);
        }
        Ok(())
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Flow control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handshake {
    None,
    RtsCts,
}

/// 16550-style FIFO trigger level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoTrigger {
    Bytes1,
    Bytes4,
    Bytes8,
    Bytes14,
}

impl FifoTrigger {
    /// Trigger level in bytes
    pub fn bytes(self) -> usize {
        match self {
            FifoTrigger::Bytes1 => 1,
            FifoTrigger::Bytes4 => 4,
            FifoTrigger::Bytes8 => 8,
            FifoTrigger::Bytes14 => 14,
        }
    }
}
