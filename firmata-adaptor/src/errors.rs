use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;
use crate::errors::ProtocolError::IoException;
use crate::io::PinModeId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: Are you sure your code runs inside #[firmata_adaptor::runtime]?
    RuntimeError,
    /// Protocol error: {source}.
    ProtocolError { source: ProtocolError },
    /// Hardware error: {source}.
    HardwareError { source: HardwareError },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        error!("std::io error {:?}", error);
        let info = match error.kind() {
            std::io::ErrorKind::NotFound => String::from("Board not found or already in use"),
            std::io::ErrorKind::PermissionDenied => String::from("Board connection lost"),
            _ => error.to_string(),
        };
        Self::ProtocolError {
            source: IoException { info },
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(value: ProtocolError) -> Self {
        Self::ProtocolError { source: value }
    }
}

impl From<HardwareError> for Error {
    fn from(value: HardwareError) -> Self {
        Self::HardwareError { source: value }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProtocolError {
    /// {info}
    IoException { info: String },
    /// Connection has not been initialized
    NotInitialized,
    /// Client is not connected
    NotConnected,
    /// No reply received for event '{event}'
    NoReply { event: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HardwareError {
    /// Pin ({pin}) not compatible with mode ({mode}) - {context}
    IncompatibleMode {
        pin: u16,
        mode: PinModeId,
        context: &'static str,
    },
    /// Unknown pin {pin}
    UnknownPin { pin: u16 },
    /// Invalid pin identifier '{pin}'
    InvalidPin { pin: String },
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::HardwareError::{IncompatibleMode, InvalidPin, UnknownPin};

    use super::*;

    #[test]
    fn test_error_display() {
        let runtime_error = RuntimeError;
        assert_eq!(
            format!("{}", runtime_error),
            "Runtime error: Are you sure your code runs inside #[firmata_adaptor::runtime]?"
        );

        let protocol_error = Error::from(IoException {
            info: "I/O error message".to_string(),
        });
        assert_eq!(
            format!("{}", protocol_error),
            "Protocol error: I/O error message."
        );

        let hardware_error = Error::from(IncompatibleMode {
            pin: 1,
            mode: PinModeId::SERVO,
            context: "test context",
        });
        assert_eq!(
            format!("{}", hardware_error),
            "Hardware error: Pin (1) not compatible with mode (SERVO) - test context."
        );

        let unknown_error = Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert_eq!(
            format!("{}", error),
            "Protocol error: Board not found or already in use."
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Protocol error: Board connection lost.");

        let io_error = io::Error::new(io::ErrorKind::Other, "custom");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Protocol error: custom.");
    }

    #[test]
    fn test_from_protocol_error() {
        let error: Error = ProtocolError::NotInitialized.into();
        assert_eq!(
            format!("{}", error),
            "Protocol error: Connection has not been initialized."
        );

        let error: Error = ProtocolError::NoReply {
            event: String::from("i2c_reply"),
        }
        .into();
        assert_eq!(
            format!("{}", error),
            "Protocol error: No reply received for event 'i2c_reply'."
        );
    }

    #[test]
    fn test_from_hardware_error() {
        let error: Error = UnknownPin { pin: 42 }.into();
        assert_eq!(format!("{}", error), "Hardware error: Unknown pin 42.");

        let error: Error = InvalidPin {
            pin: String::from("D13"),
        }
        .into();
        assert_eq!(
            format!("{}", error),
            "Hardware error: Invalid pin identifier 'D13'."
        );
    }
}
