//! Mock serial port and host for testing
//!
//! Provides an in-memory port with a bounded transmit FIFO, allowing tests
//! to drive the protocol engine without hardware. Written bytes stay
//! "in flight" until [`MockPort::drain`] is called, which is what makes the
//! transmit-free count return to full capacity.

use heapless::{Deque, Vec};

use crate::serial::{CloseError, OpenError, PortConfig, SerialHost, SerialPort};

/// Capacity of the transmitted-bytes log
pub const SENT_LOG_SIZE: usize = 512;

/// Capacity of the receive queue
pub const RX_QUEUE_SIZE: usize = 64;

/// Error from mock port operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Injected I/O failure
    Io,
}

/// Mock serial port
///
/// # Example
///
/// ```
/// use epos_hal::mock::MockPort;
/// use epos_hal::SerialPort;
///
/// let mut port = MockPort::new(14);
/// assert_eq!(port.write(b"ab"), Ok(0));
/// assert_eq!(port.tx_free(), 12);
/// port.drain();
/// assert_eq!(port.tx_free(), 14);
/// assert_eq!(port.sent(), b"ab");
/// ```
#[derive(Debug)]
pub struct MockPort {
    tx_capacity: usize,
    in_flight: usize,
    sent: Vec<u8, SENT_LOG_SIZE>,
    rx: Deque<u8, RX_QUEUE_SIZE>,
    fail_writes: bool,
    fail_reads: bool,
    fail_thresholds: bool,
    thresholds: (usize, usize),
}

impl MockPort {
    /// Create a mock port with the given transmit FIFO size
    pub fn new(tx_capacity: usize) -> Self {
        Self {
            tx_capacity,
            in_flight: 0,
            sent: Vec::new(),
            rx: Deque::new(),
            fail_writes: false,
            fail_reads: false,
            fail_thresholds: false,
            thresholds: (1, 1),
        }
    }

    /// All bytes accepted for transmission so far
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Clear the transmitted-bytes log
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Pretend the transmitter emptied its FIFO
    pub fn drain(&mut self) {
        self.in_flight = 0;
    }

    /// Occupy `count` bytes of the transmit FIFO
    pub fn fill_tx(&mut self, count: usize) {
        self.in_flight = (self.in_flight + count).min(self.tx_capacity);
    }

    /// Queue bytes as if received from the device
    pub fn inject_rx(&mut self, data: &[u8]) {
        for &byte in data {
            // Bytes beyond the queue are dropped, like a real overrun
            let _ = self.rx.push_back(byte);
        }
    }

    /// Bytes currently readable
    pub fn rx_available(&self) -> usize {
        self.rx.len()
    }

    /// Bytes of transmit FIFO currently free
    pub fn tx_free(&self) -> usize {
        self.tx_capacity - self.in_flight
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent read fail
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent threshold update fail
    pub fn set_fail_thresholds(&mut self, fail: bool) {
        self.fail_thresholds = fail;
    }

    /// Last notification thresholds set as (rx, tx)
    pub fn thresholds(&self) -> (usize, usize) {
        self.thresholds
    }
}

impl SerialPort for MockPort {
    type Error = MockError;

    fn write(&mut self, data: &[u8]) -> Result<usize, MockError> {
        if self.fail_writes {
            return Err(MockError::Io);
        }
        let accepted = data.len().min(self.tx_free());
        let _ = self.sent.extend_from_slice(&data[..accepted]);
        self.in_flight += accepted;
        Ok(data.len() - accepted)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        if self.fail_reads {
            return Err(MockError::Io);
        }
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn tx_capacity(&self) -> usize {
        self.tx_capacity
    }

    fn set_thresholds(&mut self, rx: usize, tx: usize) -> Result<(), MockError> {
        if self.fail_thresholds {
            return Err(MockError::Io);
        }
        self.thresholds = (rx, tx);
        Ok(())
    }
}

/// Mock serial host
#[derive(Debug, Default)]
pub struct MockHost {
    /// Error returned by the next `open`
    pub open_error: Option<OpenError>,
    /// Error returned by every `close`
    pub close_error: Option<CloseError>,
    /// Ports handed out start with failing threshold updates
    pub fail_thresholds: bool,
    /// Number of successful opens
    pub opened: usize,
    /// Number of close calls
    pub closed: usize,
}

impl MockHost {
    /// Create a host that opens ports successfully
    pub fn new() -> Self {
        Self::default()
    }
}

impl SerialHost for MockHost {
    type Port = MockPort;

    fn open(&mut self, config: &PortConfig) -> Result<MockPort, OpenError> {
        if let Some(err) = self.open_error.take() {
            return Err(err);
        }
        self.opened += 1;
        let mut port = MockPort::new(config.fifo.bytes());
        port.set_fail_thresholds(self.fail_thresholds);
        Ok(port)
    }

    fn close(&mut self, _port: MockPort) -> Result<(), CloseError> {
        self.closed += 1;
        match self.close_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
