use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::str::FromStr;

use log::trace;
use tokio::sync::oneshot;

use crate::adaptors::{
    Adaptor, AnalogReader, DigitalReader, DigitalWriter, I2cConnector, PwmWriter, ServoWriter,
};
use crate::errors::HardwareError::InvalidPin;
use crate::errors::ProtocolError::NoReply;
use crate::errors::Error;
use crate::io::{
    open_serial_port, ClientEvent, FirmataClient, I2CReply, IoTransport, PinModeId, PortOpener,
};
use crate::pause;
use crate::utils::EventHandler;

/// Offset between an analog pin number ("0" for A0) and its index in the pin table.
pub const ANALOG_PIN_OFFSET: u16 = 14;

/// Configuration of a [`FirmataAdaptor`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptorConfig {
    /// The adaptor name.
    pub name: String,
    /// The serial port the board is plugged on.
    pub port: String,
}

impl Default for AdaptorConfig {
    fn default() -> Self {
        Self {
            name: String::from("Firmata"),
            port: String::new(),
        }
    }
}

/// Exposes a board driven by a [`FirmataClient`] through the framework adaptor traits.
///
/// The adaptor does not speak Firmata itself: it parses the framework pin identifiers, makes
/// sure pins are in the right mode and forwards the requests to the client.
///
/// # Example
/// ```
/// use firmata_adaptor::adaptors::{Adaptor, DigitalWriter, FirmataAdaptor};
/// use firmata_adaptor::errors::Error;
/// use firmata_adaptor::io::FirmataClient;
///
/// fn light_on<C: FirmataClient + 'static>(client: C) -> Result<(), Error> {
///     let mut adaptor = FirmataAdaptor::new(client).with_port("/dev/ttyACM0");
///     adaptor.connect()?;
///     adaptor.digital_write("13", 1)?;
///     adaptor.finalize()
/// }
/// ```
#[derive(Clone)]
pub struct FirmataAdaptor {
    name: String,
    port: String,
    client: Box<dyn FirmataClient>,
    transport: Option<Box<dyn IoTransport>>,
    opener: PortOpener,
}

impl FirmataAdaptor {
    /// Creates an adaptor driving the given client.
    ///
    /// The port is empty and no transport is set: one of [`Self::with_port`] or
    /// [`Self::with_transport`] is required before connecting to a real board.
    pub fn new<C: FirmataClient + 'static>(client: C) -> Self {
        Self::from_config(client, AdaptorConfig::default())
    }

    /// Creates an adaptor driving the given client with the given configuration.
    pub fn from_config<C: FirmataClient + 'static>(client: C, config: AdaptorConfig) -> Self {
        Self {
            name: config.name,
            port: config.port,
            client: Box::new(client),
            transport: None,
            opener: open_serial_port,
        }
    }

    /// Sets the port the transport will be opened on when connecting.
    pub fn with_port<P: Into<String>>(mut self, port: P) -> Self {
        self.port = port.into();
        self
    }

    /// Sets an already opened transport: the port then only serves as a label.
    pub fn with_transport<T: IoTransport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Overrides how a transport is opened from the port (serial 57600 baud by default).
    pub fn with_opener(mut self, opener: PortOpener) -> Self {
        self.opener = opener;
        self
    }

    /// Returns the configured port.
    pub fn get_port(&self) -> String {
        self.port.clone()
    }

    /// Returns the transport the client has been connected with (if any).
    pub fn get_transport(&self) -> Option<&dyn IoTransport> {
        self.transport.as_deref()
    }

    /// Disconnects the client from the board.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        self.client.disconnect()?;
        trace!("Adaptor '{}' is disconnected", self.name);
        Ok(())
    }

    /// Configures the pulse range (in microseconds) of the servo attached to `pin`.
    pub fn servo_config(&mut self, pin: &str, min: u16, max: u16) -> Result<(), Error> {
        let pin = parse_pin(pin)?;
        self.client.servo_config(pin, min..=max)
    }

    /// Registers a callback on one of the client events.
    ///
    /// # Example
    /// ```
    /// use firmata_adaptor::adaptors::FirmataAdaptor;
    /// use firmata_adaptor::io::{ClientEvent, I2CReply};
    ///
    /// fn log_replies(adaptor: &FirmataAdaptor) {
    ///     adaptor.on(ClientEvent::I2cReply, |reply: I2CReply| async move {
    ///         println!("Received {:?} from {:#04x}", reply.data, reply.address);
    ///         Ok(())
    ///     });
    /// }
    /// ```
    pub fn on<F, T, Fut>(&self, event: ClientEvent, callback: F) -> EventHandler
    where
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.client
            .get_events()
            .on(self.client.event(event), callback)
    }

    /// Same as [`Self::on()`] but the callback is unregistered after its first call.
    pub fn once<F, T, Fut>(&self, event: ClientEvent, callback: F) -> EventHandler
    where
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.client
            .get_events()
            .once(self.client.event(event), callback)
    }

    /// Sets the pin mode unless the pin already is in it. Returns whether the mode changed.
    fn ensure_mode(&mut self, pin: u16, mode: PinModeId) -> Result<bool, Error> {
        let current = self.client.get_data().read().get_pin(pin)?.mode.id;
        if current == mode {
            return Ok(false);
        }
        self.client.set_pin_mode(pin, mode)?;
        trace!("Pin {} mode changed from {} to {}", pin, current, mode);
        Ok(true)
    }

    fn pin_value(&self, pin: u16) -> Result<u16, Error> {
        Ok(self.client.get_data().read().get_pin(pin)?.value)
    }
}

/// Parses a framework pin identifier.
///
/// # Errors
/// * `InvalidPin` - the identifier is not a non-negative integer in range.
fn parse_pin<T: FromStr>(pin: &str) -> Result<T, Error> {
    pin.parse::<T>().map_err(|_| {
        InvalidPin {
            pin: pin.to_string(),
        }
        .into()
    })
}

impl Adaptor for FirmataAdaptor {
    fn get_name(&self) -> String {
        self.name.clone()
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn connect(&mut self) -> Result<(), Error> {
        let transport = match self.transport.clone() {
            Some(transport) => transport,
            None => {
                let transport = (self.opener)(&self.port)?;
                self.transport = Some(transport.clone());
                transport
            }
        };
        self.client.connect(transport)?;
        trace!("Adaptor '{}' is connected: {}", self.name, self.client);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        self.disconnect()
    }
}

impl DigitalWriter for FirmataAdaptor {
    fn digital_write(&mut self, pin: &str, level: u8) -> Result<(), Error> {
        let pin = parse_pin(pin)?;
        self.ensure_mode(pin, PinModeId::OUTPUT)?;
        self.client.digital_write(pin, level != 0)
    }
}

impl DigitalReader for FirmataAdaptor {
    async fn digital_read(&mut self, pin: &str) -> Result<u16, Error> {
        let pin = parse_pin(pin)?;
        if self.ensure_mode(pin, PinModeId::INPUT)? {
            self.client.report_digital(pin, true)?;
            pause!(10);
        }
        self.pin_value(pin)
    }
}

impl AnalogReader for FirmataAdaptor {
    async fn analog_read(&mut self, pin: &str) -> Result<u16, Error> {
        let channel: u8 = parse_pin(pin)?;
        let pin = u16::from(channel) + ANALOG_PIN_OFFSET;
        if self.ensure_mode(pin, PinModeId::ANALOG)? {
            // Analog reporting is addressed by channel, not by pin table index.
            self.client.report_analog(channel, true)?;
            pause!(10);
        }
        self.pin_value(pin)
    }
}

impl PwmWriter for FirmataAdaptor {
    fn pwm_write(&mut self, pin: &str, level: u8) -> Result<(), Error> {
        let pin = parse_pin(pin)?;
        self.ensure_mode(pin, PinModeId::PWM)?;
        self.client.analog_write(pin, u16::from(level))
    }
}

impl ServoWriter for FirmataAdaptor {
    fn servo_write(&mut self, pin: &str, angle: u8) -> Result<(), Error> {
        let pin = parse_pin(pin)?;
        self.ensure_mode(pin, PinModeId::SERVO)?;
        self.client.analog_write(pin, u16::from(angle))
    }
}

impl I2cConnector for FirmataAdaptor {
    /// The address is not used: the bus is configured once for all devices.
    fn i2c_start(&mut self, _address: u8) -> Result<(), Error> {
        self.client.i2c_config(0)
    }

    /// Waits for the next I2C reply the client emits, with no timeout.
    async fn i2c_read(&mut self, address: u8, size: u16) -> Result<Vec<u8>, Error> {
        let event = self.client.event(ClientEvent::I2cReply);
        let (tx, rx) = oneshot::channel::<Vec<u8>>();

        // Subscribed before the request: the reply may be emitted while the request is sent.
        let mut sender = Some(tx);
        let handler = self
            .client
            .get_events()
            .once(event.clone(), move |reply: I2CReply| {
                let sender = sender.take();
                async move {
                    if let Some(sender) = sender {
                        let _ = sender.send(reply.data);
                    }
                    Ok(())
                }
            });

        if let Err(error) = self.client.i2c_read(address, size) {
            self.client.get_events().unregister(handler);
            return Err(error);
        }
        trace!("I2C read request sent to {:#04x} ({} bytes)", address, size);

        let data = rx.await.map_err(|_| NoReply { event })?;
        trace!("I2C reply received from {:#04x}: {:?}", address, data);
        Ok(data)
    }

    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.client.i2c_write(address, data)
    }
}

impl Display for FirmataAdaptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FirmataAdaptor [name={}, port={}]", self.name, self.port)
    }
}

impl Debug for FirmataAdaptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirmataAdaptor")
            .field("name", &self.name)
            .field("port", &self.port)
            .field("client", &self.client)
            .field("transport", &self.transport)
            .finish()
    }
}
