use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use parking_lot::Mutex;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::errors::Error;
use crate::errors::ProtocolError::NotInitialized;
use crate::io::IoTransport;

/// Baud rate StandardFirmata sketches talk at.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Serial port [`IoTransport`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Serial {
    /// The connection port.
    port: String,
    /// The connection speed.
    baud_rate: u32,
    /// A Read/Write io object.
    #[cfg_attr(feature = "serde", serde(skip))]
    io: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
}

impl Serial {
    /// Constructs a new `Serial` transport layer instance for communication through the specified port.
    ///
    /// # Example
    /// ```
    /// use firmata_adaptor::io::Serial;
    ///
    /// let transport = Serial::new("/dev/ttyACM0");
    /// assert_eq!(transport.get_port(), "/dev/ttyACM0");
    /// ```
    pub fn new<P: Into<String>>(port: P) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            io: Arc::new(Mutex::new(None)),
        }
    }

    /// Overrides the default baud rate (57600).
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Retrieves the configured port.
    pub fn get_port(&self) -> String {
        self.port.clone()
    }

    /// Retrieves the configured baud rate.
    pub fn get_baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Display for Serial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Serial({})", self.port)
    }
}

impl IoTransport for Serial {
    fn open(&mut self) -> Result<(), Error> {
        let connexion = serialport::new(self.port.clone(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_secs(10))
            .open()?;
        trace!("Serial port is now opened: {:?}", connexion.name());

        *self.io.lock() = Some(connexion);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        *self.io.lock() = None;
        trace!("Serial port {} is now closed", self.port);
        Ok(())
    }

    fn set_timeout(&mut self, duration: Duration) -> Result<(), Error> {
        let mut lock = self.io.lock();
        lock.as_mut().ok_or(NotInitialized)?.set_timeout(duration)?;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Error> {
        let mut lock = self.io.lock();
        lock.as_mut().ok_or(NotInitialized)?.write_all(buf)?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut lock = self.io.lock();
        lock.as_mut().ok_or(NotInitialized)?.read_exact(buf)?;
        Ok(())
    }
}

impl From<serialport::Error> for Error {
    fn from(value: serialport::Error) -> Self {
        std::io::Error::from(value).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::ErrorKind;

    #[test]
    fn test_new_serial() {
        let transport = Serial::new("/dev/ttyACM0");
        assert_eq!(transport.get_port(), "/dev/ttyACM0");
        assert_eq!(transport.get_baud_rate(), 57_600);
        assert!(transport.io.lock().is_none());

        let transport = Serial::new("COM4").with_baud_rate(115_200);
        assert_eq!(transport.get_baud_rate(), 115_200);
    }

    #[test]
    fn test_not_opened_serial() {
        let mut transport = Serial::new("/dev/ttyACM0");
        assert_eq!(
            transport.write(&[1, 2, 3]).err().unwrap().to_string(),
            "Protocol error: Connection has not been initialized."
        );
        let mut buf = [0; 3];
        assert!(transport.read_exact(&mut buf).is_err());
        assert!(transport.set_timeout(Duration::from_millis(10)).is_err());
        assert!(transport.close().is_ok());
    }

    #[test]
    fn test_from_serial_error() {
        let serial_error = serialport::Error {
            kind: ErrorKind::Unknown,
            description: String::from("test error"),
        };
        let custom_error: Error = serial_error.into();
        assert_eq!(custom_error.to_string(), "Protocol error: test error.");

        let serial_error = serialport::Error {
            kind: ErrorKind::Io(std::io::ErrorKind::NotFound),
            description: String::from("IO error"),
        };
        let custom_error: Error = serial_error.into();
        assert_eq!(
            custom_error.to_string(),
            "Protocol error: Board not found or already in use."
        );
    }

    #[test]
    fn test_display_serial() {
        let transport = Serial::new("/dev/ttyACM0");
        assert_eq!(format!("{}", transport), "Serial(/dev/ttyACM0)");
    }
}
