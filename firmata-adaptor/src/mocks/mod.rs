//! Mocked entities (useful for tests mostly).

mod client;
mod transport_layer;

use std::collections::HashMap;

pub use client::MockFirmataClient;
pub use transport_layer::MockTransportLayer;

use crate::io::{IoData, Pin, PinMode, PinModeId};

fn mode(id: PinModeId, resolution: u8) -> PinMode {
    PinMode { id, resolution }
}

pub fn create_digital_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: mode(PinModeId::OUTPUT, 1),
        supported_modes: vec![
            mode(PinModeId::INPUT, 1),
            mode(PinModeId::OUTPUT, 1),
            mode(PinModeId::PULLUP, 1),
        ],
        channel: None,
        value,
    }
}

pub fn create_input_pin(id: u16, value: u16) -> Pin {
    Pin {
        mode: mode(PinModeId::INPUT, 1),
        ..create_digital_pin(id, value)
    }
}

pub fn create_pwm_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: mode(PinModeId::PWM, 8),
        supported_modes: vec![
            mode(PinModeId::INPUT, 1),
            mode(PinModeId::OUTPUT, 1),
            mode(PinModeId::PWM, 8),
            mode(PinModeId::SERVO, 14),
        ],
        channel: None,
        value,
    }
}

pub fn create_servo_pin(id: u16, value: u16) -> Pin {
    Pin {
        mode: mode(PinModeId::SERVO, 14),
        ..create_pwm_pin(id, value)
    }
}

pub fn create_analog_pin(id: u16, channel: u8, value: u16) -> Pin {
    Pin {
        id,
        name: format!("A{}", channel),
        mode: mode(PinModeId::ANALOG, 10),
        supported_modes: vec![
            mode(PinModeId::INPUT, 1),
            mode(PinModeId::OUTPUT, 1),
            mode(PinModeId::ANALOG, 10),
        ],
        channel: Some(channel),
        value,
    }
}

pub fn create_unsupported_pin(id: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: mode(PinModeId::UNSUPPORTED, 0),
        supported_modes: vec![],
        channel: None,
        value: 0,
    }
}

/// Creates the pin table of an Arduino UNO like board:
/// - 0-1: unsupported (serial RX/TX)
/// - 2-7 and 13: digital OUTPUT pins (value = id)
/// - 8, 9, 11: PWM pins (value = id)
/// - 10: digital INPUT pin (value = 10)
/// - 12: SERVO pin (value = 12)
/// - 14-19: analog pins A0-A5 (value = 100 * (channel + 1)), A1 being currently in OUTPUT mode.
pub fn create_test_io_data() -> IoData {
    let mut pins = HashMap::from([
        (0, create_unsupported_pin(0)),
        (1, create_unsupported_pin(1)),
        (8, create_pwm_pin(8, 8)),
        (9, create_pwm_pin(9, 9)),
        (10, create_input_pin(10, 10)),
        (11, create_pwm_pin(11, 11)),
        (12, create_servo_pin(12, 12)),
        (13, create_digital_pin(13, 13)),
    ]);
    for id in 2..8 {
        pins.insert(id, create_digital_pin(id, id));
    }
    for channel in 0..6u8 {
        let id = 14 + channel as u16;
        pins.insert(id, create_analog_pin(id, channel, 100 * (channel as u16 + 1)));
    }
    if let Some(a1) = pins.get_mut(&15) {
        a1.mode = mode(PinModeId::OUTPUT, 1);
    }

    IoData {
        pins,
        protocol_version: "fake.1.0".to_string(),
        firmware_name: "Fake protocol".to_string(),
        firmware_version: "fake.2.3".to_string(),
        connected: false,
    }
}
