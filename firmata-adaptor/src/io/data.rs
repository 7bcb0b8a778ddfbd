use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use crate::errors::HardwareError::{IncompatibleMode, UnknownPin};
use crate::errors::*;

/// Represents the board state a [`FirmataClient`](crate::io::FirmataClient) keeps in sync.
///
/// The client owns it behind an `Arc<RwLock<IoData>>`: the adaptor only reads it (pin table)
/// to decide whether a pin mode must be changed before an operation.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoData {
    /// All `Pin` instances, indexed by their id.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pins: HashMap<u16, Pin>,
    /// A string indicating the version of the protocol.
    pub protocol_version: String,
    /// A string representing the name of the firmware.
    pub firmware_name: String,
    /// A string representing the version of the firmware.
    pub firmware_version: String,
    /// A boolean indicating whether the client is connected.
    pub connected: bool,
}

impl IoData {
    /// Retrieves a reference to a pin by its id.
    ///
    /// # Errors
    /// * `UnknownPin` - the pin does not exist in the pin table.
    pub fn get_pin(&self, pin: u16) -> Result<&Pin, Error> {
        self.pins.get(&pin).ok_or(Error::from(UnknownPin { pin }))
    }

    /// Retrieves a mutable reference to a pin by its id.
    ///
    /// # Errors
    /// * `UnknownPin` - the pin does not exist in the pin table.
    pub fn get_pin_mut(&mut self, pin: u16) -> Result<&mut Pin, Error> {
        self.pins.get_mut(&pin).ok_or(Error::from(UnknownPin { pin }))
    }
}

/// Defines an I2C reply: the payload of the [`ClientEvent::I2cReply`](crate::io::ClientEvent) event.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2CReply {
    pub address: u8,
    pub register: u16,
    pub data: Vec<u8>,
}

/// Represents the current state and configuration of a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Default)]
pub struct Pin {
    /// The pin ID, which also corresponds to the index of the [`IoData::pins`] hashmap.
    pub id: u16,
    /// The pin name: 'D13', 'A0' for instance.
    pub name: String,
    /// Currently configured mode.
    pub mode: PinMode,
    /// All pin supported modes.
    pub supported_modes: Vec<PinMode>,
    /// For analog pin, this is the channel number ie "A0"=>0, "A1"=>1, etc...
    pub channel: Option<u8>,
    /// Pin value.
    pub value: u16,
}

impl Pin {
    /// Verifies if a pin supports the given mode and returns it if it does.
    pub fn supports_mode(&self, mode: PinModeId) -> Option<PinMode> {
        self.supported_modes.iter().find(|m| m.id == mode).copied()
    }

    /// Validates that the pin is in the given mode.
    ///
    /// # Errors
    /// *`IncompatibleMode`: the pin's current mode does not match the expected mode.
    pub fn validate_current_mode(&self, mode: PinModeId) -> Result<(), Error> {
        match self.mode.id == mode {
            true => Ok(()),
            false => Err(Error::from(IncompatibleMode {
                mode: self.mode.id,
                pin: self.id,
                context: "check_current_mode",
            })),
        }
    }
}

impl Debug for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pin")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mode", &self.mode.to_string())
            .field("supported modes", &self.supported_modes)
            .field("channel", &self.channel)
            .field("value", &self.value)
            .finish()
    }
}

// ########################################

/// Represents a mode configuration for a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Default, Copy)]
pub struct PinMode {
    /// Currently configured mode.
    pub id: PinModeId,
    /// Resolution (number of bits) this mode uses.
    pub resolution: u8,
}

impl PinMode {
    /// Get the max value this pinMode can reach according to its resolution.
    ///
    /// Resolutions of 16 bits or more saturate to `u16::MAX`.
    pub fn get_max_possible_value(&self) -> u16 {
        match self.resolution {
            resolution if resolution >= 16 => u16::MAX,
            resolution => (1u16 << resolution) - 1,
        }
    }
}

impl Display for PinMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Debug for PinMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            PinModeId::UNSUPPORTED => write!(f, "[{}]", self.id),
            _ => write!(f, "[id: {}, resolution: {}]", self.id, self.resolution),
        }
    }
}

// ########################################

/// Enumerates the possible modes for a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum PinModeId {
    /// Same as INPUT defined in Arduino.
    INPUT = 0,
    /// Same as OUTPUT defined in Arduino.h
    OUTPUT = 1,
    /// Analog pin in analogInput mode
    ANALOG = 2,
    /// Digital pin in PWM output mode
    PWM = 3,
    /// Digital pin in Servo output mode
    SERVO = 4,
    /// shiftIn/shiftOut mode
    SHIFT = 5,
    /// Pin included in I2C setup
    I2C = 6,
    /// Pin configured for 1-wire
    ONEWIRE = 7,
    /// Pin configured for stepper motor
    STEPPER = 8,
    /// Pin configured for rotary encoders
    ENCODER = 9,
    /// Pin configured for serial communication
    SERIAL = 0x0A,
    /// Enable internal pull-up resistor for pin
    PULLUP = 0x0B,
    /// Pin configured for SPI
    SPI = 0x0C,
    /// Pin configured for proximity sensors
    SONAR = 0x0D,
    /// Pin configured for piezzo buzzer tone generation
    TONE = 0x0E,
    /// Pin configured for DHT humidity and temperature sensors
    DHT = 0x0F,
    /// Pin configured to be ignored by digitalWrite and capabilityResponse
    #[default]
    UNSUPPORTED = 0x7F,
}

impl PinModeId {
    /// Converts a `u8` byte value into a `PinModeId`.
    ///
    /// # Errors
    /// * `Unknown`: The value does not match any known pin mode.
    pub fn from_u8(value: u8) -> Result<PinModeId, Error> {
        match value {
            0 => Ok(PinModeId::INPUT),
            1 => Ok(PinModeId::OUTPUT),
            2 => Ok(PinModeId::ANALOG),
            3 => Ok(PinModeId::PWM),
            4 => Ok(PinModeId::SERVO),
            5 => Ok(PinModeId::SHIFT),
            6 => Ok(PinModeId::I2C),
            7 => Ok(PinModeId::ONEWIRE),
            8 => Ok(PinModeId::STEPPER),
            9 => Ok(PinModeId::ENCODER),
            0x0A => Ok(PinModeId::SERIAL),
            0x0B => Ok(PinModeId::PULLUP),
            0x0C => Ok(PinModeId::SPI),
            0x0D => Ok(PinModeId::SONAR),
            0x0E => Ok(PinModeId::TONE),
            0x0F => Ok(PinModeId::DHT),
            0x7F => Ok(PinModeId::UNSUPPORTED),
            x => Err(Unknown {
                info: format!("PinMode not found with value: {}", x),
            }),
        }
    }
}

impl From<PinModeId> for u8 {
    fn from(mode: PinModeId) -> u8 {
        mode as u8
    }
}

impl Display for PinModeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::io::{Pin, PinMode, PinModeId};
    use crate::mocks::create_test_io_data;

    #[test]
    fn test_get_pin() {
        let mut data = create_test_io_data();
        assert_eq!(data.get_pin(3).unwrap().value, 3);
        assert_eq!(data.get_pin_mut(11).unwrap().value, 11);
        data.get_pin_mut(11).unwrap().value = 255;
        assert_eq!(data.get_pin(11).unwrap().value, 255);

        assert!(data.get_pin(66).is_err());
        assert_eq!(
            data.get_pin_mut(66).err().unwrap().to_string(),
            "Hardware error: Unknown pin 66."
        );
    }

    #[test]
    fn test_pin_supports_mode() {
        let pin = Pin {
            supported_modes: vec![
                PinMode {
                    id: PinModeId::INPUT,
                    resolution: 1,
                },
                PinMode {
                    id: PinModeId::PWM,
                    resolution: 8,
                },
            ],
            ..Default::default()
        };

        let mode = pin.supports_mode(PinModeId::PWM);
        assert!(mode.is_some());
        assert_eq!(mode.unwrap().get_max_possible_value(), 255);
        assert!(pin.supports_mode(PinModeId::SERVO).is_none());
    }

    #[test]
    fn test_max_possible_value() {
        let max = |resolution: u8| {
            PinMode {
                id: PinModeId::PWM,
                resolution,
            }
            .get_max_possible_value()
        };
        assert_eq!(max(0), 0);
        assert_eq!(max(1), 1);
        assert_eq!(max(10), 1023);
        assert_eq!(max(14), 16383);
        assert_eq!(max(15), 32767);
        assert_eq!(max(16), u16::MAX);
        assert_eq!(max(17), u16::MAX);
        assert_eq!(max(32), u16::MAX);
        assert_eq!(max(255), u16::MAX);
    }

    #[test]
    fn test_validate_current_mode() {
        let pin = Pin {
            id: 8,
            mode: PinMode {
                id: PinModeId::PWM,
                resolution: 10,
            },
            ..Default::default()
        };

        assert!(pin.validate_current_mode(PinModeId::PWM).is_ok());
        assert_eq!(
            pin.validate_current_mode(PinModeId::SHIFT)
                .err()
                .unwrap()
                .to_string(),
            "Hardware error: Pin (8) not compatible with mode (PWM) - check_current_mode."
        );
    }

    #[test]
    fn test_pin_debug() {
        let pin = Pin {
            id: 14,
            name: String::from("A0"),
            mode: PinMode {
                id: PinModeId::ANALOG,
                resolution: 10,
            },
            supported_modes: vec![PinMode {
                id: PinModeId::ANALOG,
                resolution: 10,
            }],
            channel: Some(0),
            value: 512,
        };
        assert_eq!(
            format!("{:?}", pin),
            "Pin { id: 14, name: \"A0\", mode: \"ANALOG\", supported modes: [[id: ANALOG, resolution: 10]], channel: Some(0), value: 512 }"
        );

        let unsupported = PinMode::default();
        assert_eq!(format!("{:?}", unsupported), "[UNSUPPORTED]");
    }

    #[test]
    fn test_pin_mode_id_conversions() {
        assert_eq!(PinModeId::from_u8(0).unwrap(), PinModeId::INPUT);
        assert_eq!(PinModeId::from_u8(2).unwrap(), PinModeId::ANALOG);
        assert_eq!(PinModeId::from_u8(3).unwrap(), PinModeId::PWM);
        assert_eq!(PinModeId::from_u8(4).unwrap(), PinModeId::SERVO);
        assert_eq!(PinModeId::from_u8(0x0B).unwrap(), PinModeId::PULLUP);
        assert_eq!(PinModeId::from_u8(0x7F).unwrap(), PinModeId::UNSUPPORTED);
        assert_eq!(
            PinModeId::from_u8(100).err().unwrap().to_string(),
            "Unknown error: PinMode not found with value: 100."
        );
        assert_eq!(u8::from(PinModeId::SERVO), 4);
        assert_eq!(PinModeId::OUTPUT.to_string(), "OUTPUT");
    }
}
