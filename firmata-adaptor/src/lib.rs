#![doc(html_root_url = "https://docs.rs/firmata-adaptor/0.1.0")]

//! <h1 align="center">FIRMATA-ADAPTOR</h1>
//! <div style="text-align:center;font-style:italic;">Plugs a Firmata board into a robotics framework.</div>
//!
//! # Features
//!
//! **Firmata-Adaptor** exposes the digital/analog I/O, PWM, servo and I2C capabilities of an Arduino (or
//! compatible) board running [StandardFirmata](https://github.com/firmata/arduino) to a robotics framework.
//!
//! - The framework side is a set of small traits ([`Adaptor`](adaptors::Adaptor),
//!   [`DigitalWriter`](adaptors::DigitalWriter), [`AnalogReader`](adaptors::AnalogReader),
//!   [`I2cConnector`](adaptors::I2cConnector), etc.) taking pins as strings.
//! - The board side is any [`FirmataClient`](io::FirmataClient) implementation: this crate does not
//!   implement the Firmata wire protocol itself.
//! - [`FirmataAdaptor`](adaptors::FirmataAdaptor) bridges the two: it parses the pins, switches pin modes
//!   when needed, enables reporting for reads and waits for I2C replies.
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! firmata-adaptor = "0.1.0"
//! ```
//!
//! - Wrap a client into an adaptor:
//! ```rust
//! use firmata_adaptor::adaptors::{Adaptor, AnalogReader, FirmataAdaptor};
//! use firmata_adaptor::errors::Error;
//! use firmata_adaptor::io::FirmataClient;
//!
//! async fn read_potentiometer<C: FirmataClient + 'static>(client: C) -> Result<u16, Error> {
//!     // Opens /dev/ttyACM0 at 57600 bauds and hands it to the client.
//!     let mut adaptor = FirmataAdaptor::new(client).with_port("/dev/ttyACM0");
//!     adaptor.connect()?;
//!
//!     // A0
//!     let value = adaptor.analog_read("0").await?;
//!     adaptor.finalize()?;
//!     Ok(value)
//! }
//! ```
//!
//! # Feature flags
//!
//! - **libudev** -- (enabled by default) Activates `serialport` crate _libudev_ feature under-the-hood (required on Linux only for port listing).
//! - **serde** -- Enables serialize/deserialize capabilities for the configuration and data entities.
//! - **mocks** -- Provides a mocked client and transport (useful for tests mostly).

#[cfg(test)]
extern crate self as firmata_adaptor;

pub mod adaptors;
pub mod errors;
pub mod io;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod utils;

pub use firmata_adaptor_macros::runtime;
