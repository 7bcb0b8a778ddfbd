use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::HardwareError::IncompatibleMode;
use crate::errors::ProtocolError::{IoException, NotConnected};
use crate::errors::Error;
use crate::io::{ClientEvent, FirmataClient, I2CReply, IoData, IoTransport, PinModeId};
use crate::mocks::create_test_io_data;
use crate::utils::EventManager;

/// Mock implementation of a [`FirmataClient`].
///
/// Uses [`create_test_io_data`] for the pin table, records every call it receives and answers I2C
/// read requests with a configurable payload. Clones share the same state.
#[derive(Clone, Debug)]
pub struct MockFirmataClient {
    data: Arc<RwLock<IoData>>,
    events: EventManager,
    calls: Arc<RwLock<Vec<String>>>,
    failures: Arc<RwLock<Vec<&'static str>>>,
    i2c_response: Arc<RwLock<Option<Vec<u8>>>>,
    transport: Arc<RwLock<Option<Box<dyn IoTransport>>>>,
}

impl Default for MockFirmataClient {
    fn default() -> Self {
        Self {
            data: Arc::new(RwLock::new(create_test_io_data())),
            events: EventManager::default(),
            calls: Arc::new(RwLock::new(vec![])),
            failures: Arc::new(RwLock::new(vec![])),
            i2c_response: Arc::new(RwLock::new(Some(vec![0x42, 0x43, 0x44, 0x45]))),
            transport: Arc::new(RwLock::new(None)),
        }
    }
}

impl MockFirmataClient {
    /// Makes the given operation (`"connect"`, `"set_pin_mode"`, `"i2c_read"`...) fail.
    pub fn fail_on(self, operation: &'static str) -> Self {
        self.failures.write().push(operation);
        self
    }

    /// Sets the bytes answered to I2C read requests: `None` means the board never answers.
    pub fn with_i2c_response(self, response: Option<Vec<u8>>) -> Self {
        *self.i2c_response.write() = response;
        self
    }

    /// Overrides a pin value (as if reported by the board).
    pub fn set_pin_value(&self, pin: u16, value: u16) -> Result<(), Error> {
        self.data.write().get_pin_mut(pin)?.value = value;
        Ok(())
    }

    /// Returns the calls received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    /// Returns the transport received on connect (if any).
    pub fn transport(&self) -> Option<Box<dyn IoTransport>> {
        self.transport.read().clone()
    }

    fn record(&self, operation: &'static str, call: String) -> Result<(), Error> {
        self.calls.write().push(call);
        match self.failures.read().contains(&operation) {
            true => Err(IoException {
                info: format!("{} failed", operation),
            }
            .into()),
            false => Ok(()),
        }
    }
}

impl Display for MockFirmataClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.data.read();
        write!(
            f,
            "MockFirmataClient [firmware={}, version={}, protocol={}]",
            data.firmware_name, data.firmware_version, data.protocol_version,
        )
    }
}

impl FirmataClient for MockFirmataClient {
    fn get_data(&self) -> &Arc<RwLock<IoData>> {
        &self.data
    }

    fn get_events(&self) -> &EventManager {
        &self.events
    }

    fn connect(&mut self, transport: Box<dyn IoTransport>) -> Result<(), Error> {
        self.record("connect", format!("connect({})", transport))?;
        *self.transport.write() = Some(transport);
        self.data.write().connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        self.record("disconnect", String::from("disconnect()"))?;
        self.data.write().connected = false;
        Ok(())
    }

    fn set_pin_mode(&mut self, pin: u16, mode: PinModeId) -> Result<(), Error> {
        self.record("set_pin_mode", format!("set_pin_mode({}, {})", pin, mode))?;
        let mut lock = self.data.write();
        let pin_instance = lock.get_pin_mut(pin)?;
        pin_instance.mode = pin_instance.supports_mode(mode).ok_or(IncompatibleMode {
            pin,
            mode,
            context: "try to set pin mode",
        })?;
        Ok(())
    }

    fn digital_write(&mut self, pin: u16, level: bool) -> Result<(), Error> {
        self.record("digital_write", format!("digital_write({}, {})", pin, level))?;
        let mut lock = self.data.write();
        let pin_instance = lock.get_pin_mut(pin)?;
        pin_instance.validate_current_mode(PinModeId::OUTPUT)?;
        pin_instance.value = u16::from(level);
        Ok(())
    }

    fn analog_write(&mut self, pin: u16, level: u16) -> Result<(), Error> {
        self.record("analog_write", format!("analog_write({}, {})", pin, level))?;
        self.data.write().get_pin_mut(pin)?.value = level;
        Ok(())
    }

    fn report_digital(&mut self, pin: u16, state: bool) -> Result<(), Error> {
        self.record("report_digital", format!("report_digital({}, {})", pin, state))
    }

    fn report_analog(&mut self, channel: u8, state: bool) -> Result<(), Error> {
        self.record(
            "report_analog",
            format!("report_analog({}, {})", channel, state),
        )
    }

    fn i2c_config(&mut self, delay: u16) -> Result<(), Error> {
        self.record("i2c_config", format!("i2c_config({})", delay))
    }

    fn i2c_read(&mut self, address: u8, size: u16) -> Result<(), Error> {
        self.record("i2c_read", format!("i2c_read({:#04x}, {})", address, size))?;
        if !self.is_connected() {
            return Err(NotConnected.into());
        }
        if let Some(response) = self.i2c_response.read().as_ref() {
            let reply = I2CReply {
                address,
                register: 0,
                data: response.iter().take(size as usize).copied().collect(),
            };
            self.events.emit(self.event(ClientEvent::I2cReply), reply);
        }
        Ok(())
    }

    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.record(
            "i2c_write",
            format!("i2c_write({:#04x}, {:02X?})", address, data),
        )
    }

    fn servo_config(&mut self, pin: u16, pulse: RangeInclusive<u16>) -> Result<(), Error> {
        self.record(
            "servo_config",
            format!("servo_config({}, {:?})", pin, pulse),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockTransportLayer;

    #[test]
    fn test_mock_client_records_calls() {
        let client = MockFirmataClient::default();
        let mut boxed: Box<dyn FirmataClient> = Box::new(client.clone());

        boxed
            .connect(Box::new(MockTransportLayer::opened()))
            .unwrap();
        boxed.set_pin_mode(13, PinModeId::INPUT).unwrap();
        boxed.i2c_write(0x40, &[0x01, 0xFF]).unwrap();
        boxed.servo_config(12, 500..=2500).unwrap();

        assert!(client.is_connected());
        assert_eq!(
            client.calls(),
            vec![
                "connect(MockTransportLayer)",
                "set_pin_mode(13, INPUT)",
                "i2c_write(0x40, [01, FF])",
                "servo_config(12, 500..=2500)",
            ]
        );
        assert!(client.transport().is_some());
    }

    #[test]
    fn test_mock_client_failures() {
        let mut client = MockFirmataClient::default().fail_on("report_digital");
        assert_eq!(
            client.report_digital(3, true).err().unwrap().to_string(),
            "Protocol error: report_digital failed."
        );
        assert_eq!(
            client
                .set_pin_mode(13, PinModeId::SERVO)
                .err()
                .unwrap()
                .to_string(),
            "Hardware error: Pin (13) not compatible with mode (SERVO) - try to set pin mode."
        );
        assert!(client.i2c_read(0x40, 2).is_err(), "Not connected");
    }

    #[test]
    fn test_mock_client_display() {
        let client = MockFirmataClient::default();
        assert_eq!(
            client.to_string(),
            "MockFirmataClient [firmware=Fake protocol, version=fake.2.3, protocol=fake.1.0]"
        );
    }
}
