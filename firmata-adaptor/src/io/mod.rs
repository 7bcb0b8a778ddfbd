//! Defines the capability set consumed from a Firmata protocol client.
//!
//! The client itself (message framing, serial parsing, capability negotiation) is not part of this
//! crate: any implementation of [`FirmataClient`] can be plugged into a
//! [`FirmataAdaptor`](crate::adaptors::FirmataAdaptor).

mod data;
mod transports;

use std::fmt::{Debug, Display};
use std::ops::RangeInclusive;
use std::sync::Arc;

use dyn_clone::DynClone;
use parking_lot::RwLock;

use crate::errors::Error;
use crate::utils::EventManager;
pub use data::*;
pub use transports::*;

/// Lists the named events a [`FirmataClient`] can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    /// Triggered when an I2C reply has been decoded. Payload: [`I2CReply`].
    I2cReply,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<ClientEvent> for String {
    fn from(value: ClientEvent) -> Self {
        let event = match value {
            ClientEvent::I2cReply => "i2c_reply",
        };
        event.into()
    }
}

// Makes a Box<dyn FirmataClient> clone.
dyn_clone::clone_trait_object!(FirmataClient);

/// Defines the operations a Firmata protocol client provides to the adaptor.
///
/// <https://github.com/firmata/protocol/blob/master/protocol.md>
pub trait FirmataClient: DynClone + Send + Sync + Debug + Display {
    // ########################################
    // Inner data related functions

    /// Returns a protected arc to the client synced [`IoData`] (pin table).
    fn get_data(&self) -> &Arc<RwLock<IoData>>;

    /// Returns the event manager the client emits its [`ClientEvent`]s through.
    fn get_events(&self) -> &EventManager;

    /// Resolves the name under which the client emits the given event.
    fn event(&self, event: ClientEvent) -> String {
        event.into()
    }

    /// Checks if the client is connected to the board.
    fn is_connected(&self) -> bool {
        self.get_data().read().connected
    }

    // ########################################
    // Connection

    /// Starts talking to the board over an already opened `transport`.
    fn connect(&mut self, transport: Box<dyn IoTransport>) -> Result<(), Error>;
    /// Gracefully shuts down the communication.
    fn disconnect(&mut self) -> Result<(), Error>;

    // ########################################
    // Read/Write on pins

    /// Sets the `mode` of the specified `pin`.
    fn set_pin_mode(&mut self, pin: u16, mode: PinModeId) -> Result<(), Error>;

    /// Writes `level` to the digital `pin`.
    ///
    /// Send an DIGITAL_MESSAGE (0x90 - set digital value).
    fn digital_write(&mut self, pin: u16, level: bool) -> Result<(), Error>;

    /// Writes `level` to the analog `pin` (PWM and SERVO pins included).
    ///
    /// Send an ANALOG_MESSAGE (0xE0 - set analog value).
    fn analog_write(&mut self, pin: u16, level: u16) -> Result<(), Error>;

    /// Sets the digital reporting `state` of the port the `pin` belongs to.
    fn report_digital(&mut self, pin: u16, state: bool) -> Result<(), Error>;

    /// Sets the reporting `state` of the specified analog `channel`.
    fn report_analog(&mut self, channel: u8, state: bool) -> Result<(), Error>;

    // ########################################
    // I2C

    /// Configures the `delay` in microseconds for I2C devices that require a delay between when the
    /// register is written to and the data in that register can be read.
    fn i2c_config(&mut self, delay: u16) -> Result<(), Error>;
    /// Requests `size` bytes from I2C device at the specified `address`.
    ///
    /// The answer is not returned: it is emitted later as a [`ClientEvent::I2cReply`].
    fn i2c_read(&mut self, address: u8, size: u16) -> Result<(), Error>;
    /// Writes `data` to the I2C device at the specified `address`.
    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error>;

    // ########################################
    // SERVO

    /// Sends a SERVO_CONFIG command (0x70 - configure servo)
    /// <https://github.com/firmata/protocol/blob/master/servos.md>
    fn servo_config(&mut self, pin: u16, pulse: RangeInclusive<u16>) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockFirmataClient;

    #[test]
    fn test_client_event_names() {
        assert_eq!(String::from(ClientEvent::I2cReply), "i2c_reply");

        let client = MockFirmataClient::default();
        assert_eq!(client.event(ClientEvent::I2cReply), "i2c_reply");
    }

    #[test]
    fn test_boxed_client_clone() {
        let client: Box<dyn FirmataClient> = Box::new(MockFirmataClient::default());
        let clone = client.clone();
        clone.get_data().write().connected = true;
        assert!(
            client.is_connected(),
            "Clones share the same synced data"
        );
    }
}
