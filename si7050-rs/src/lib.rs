//! Blocking driver for the Silicon Labs Si7050 digital temperature sensor.
//!
//! The sensor sits at a fixed I2C address ([`DEFAULT_ADDRESS`]) and answers
//! one- or two-byte commands. Temperature conversions use hold master mode.
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types.

#![cfg_attr(not(test), no_std)]

pub use error::Si7050Error;
pub use registers::{FirmwareRevision, Resolution, UserRegister, DEFAULT_ADDRESS};
pub use sensor::{celsius, Si7050};

mod error;
mod registers;
mod sensor;
