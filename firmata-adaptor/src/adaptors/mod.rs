//! Defines the contract a robotics framework expects from a hardware adaptor, and its Firmata
//! implementation.
//!
//! Pins are identified by strings ("13", "2"...) the way frameworks pass them through, and parsed
//! by the adaptor itself.

mod firmata;

use std::future::Future;

use crate::errors::Error;
pub use firmata::*;

/// Lifecycle and identity of a framework adaptor.
pub trait Adaptor {
    /// Returns the adaptor name.
    fn get_name(&self) -> String;
    /// Sets the adaptor name.
    fn set_name(&mut self, name: &str);
    /// Connects to the board.
    fn connect(&mut self) -> Result<(), Error>;
    /// Tears the connection down before the framework stops.
    fn finalize(&mut self) -> Result<(), Error>;
}

/// Writes a digital level on a pin.
pub trait DigitalWriter {
    fn digital_write(&mut self, pin: &str, level: u8) -> Result<(), Error>;
}

/// Reads a digital level from a pin.
pub trait DigitalReader {
    fn digital_read(&mut self, pin: &str) -> impl Future<Output = Result<u16, Error>> + Send;
}

/// Reads an analog value from an analog pin (A0 is "0", A1 is "1"...).
pub trait AnalogReader {
    fn analog_read(&mut self, pin: &str) -> impl Future<Output = Result<u16, Error>> + Send;
}

/// Writes a PWM duty cycle on a pin.
pub trait PwmWriter {
    fn pwm_write(&mut self, pin: &str, level: u8) -> Result<(), Error>;
}

/// Writes an angle to a servo attached to a pin.
pub trait ServoWriter {
    fn servo_write(&mut self, pin: &str, angle: u8) -> Result<(), Error>;
}

/// Talks to I2C devices through the board.
pub trait I2cConnector {
    /// Initializes the I2C bus.
    fn i2c_start(&mut self, address: u8) -> Result<(), Error>;
    /// Reads `size` bytes from the device at `address`.
    fn i2c_read(
        &mut self,
        address: u8,
        size: u16,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
    /// Writes `data` to the device at `address`.
    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error>;
}
