use std::fmt::{Debug, Display};
use std::time::Duration;

use dyn_clone::DynClone;

use crate::errors::Error;
pub use crate::io::transports::serial::Serial;

pub mod serial;

dyn_clone::clone_trait_object!(IoTransport);

/// Defines the connection a [`FirmataClient`](crate::io::FirmataClient) reads from and writes to.
///
/// Clones are expected to share the same underlying connection.
pub trait IoTransport: Debug + Display + DynClone + Send + Sync {
    /// Opens communication (in a blocking way) using the transport layer.
    ///
    /// # Notes
    ///  The method is sync and may block until the connection is established.
    fn open(&mut self) -> Result<(), Error>;

    /// Gracefully shuts down the transport layer.
    fn close(&mut self) -> Result<(), Error>;

    /// Sets a timeout for the transport layer
    ///
    /// # Notes
    /// This function is optional and may not be supported by all transport layers.
    fn set_timeout(&mut self, duration: Duration) -> Result<(), Error>;

    /// Write bytes to the internal connection. For more details see [`std::io::Write::write`].
    fn write(&mut self, buf: &[u8]) -> Result<(), Error>;

    /// Reads from the internal connection. For more details see [`std::io::Read::read_exact`].
    ///
    /// # Notes
    /// This function blocks until the buffer is filled or an error occurs.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error>;
}

/// Opens a transport connection on a given port.
pub type PortOpener = fn(&str) -> Result<Box<dyn IoTransport>, Error>;

/// Default [`PortOpener`]: opens a [`Serial`] transport at 57600 bauds.
pub fn open_serial_port(port: &str) -> Result<Box<dyn IoTransport>, Error> {
    let mut transport = Serial::new(port);
    transport.open()?;
    Ok(Box::new(transport))
}
