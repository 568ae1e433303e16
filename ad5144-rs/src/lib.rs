//! Blocking driver for the Analog Devices AD5144 quad digital potentiometer.
//!
//! This crate drives the AD5144 over any blocking `embedded-hal` I2C bus
//! through the [`i2c_port::Transport`] abstraction.
//!
//! # Architecture
//!
//! The crate is split into layers, bus-free ones first:
//!
//! - **[`commands`]** — The instruction set as fixed templates, channel
//!   address fields and [`build_frame`](commands::build_frame).
//! - **[`control`]** — Decoding of the 4-bit control register.
//! - **[`state`]** — Cached per-channel RDAC / input register / EEPROM
//!   values and the last control register read.
//! - **[`voltage`]** — Resistor-divider model converting volts to wiper
//!   codes and back.
//! - **[`Ad5144`]** (public) — Validated, high-level API that ties the
//!   above to the bus.
//!
//! # Quick start
//!
//! ```no_run
//! use ad5144_driver::{Ad5144, Channel, DEFAULT_ADDRESS};
//!
//! # fn example(i2c: impl embedded_hal::i2c::I2c) -> Result<(), ()> {
//! let mut pot = Ad5144::new(i2c, DEFAULT_ADDRESS);
//!
//! // Put 0.2 V on wiper 0 and read all four wipers back
//! pot.set_output_voltage(Channel::Ch0, 0.2).map_err(|_| ())?;
//! let wipers = pot.refresh_rdac().map_err(|_| ())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types
//!   and log aborted reads and failed verifications.

#![cfg_attr(not(test), no_std)]

pub use commands::{Channel, CHANNEL_COUNT, DEFAULT_ADDRESS};
pub use control::{ControlRegister, WiperMode};
pub use error::{CommandError, PotError};
pub use potentiometer::Ad5144;
pub use state::{ChannelValues, PotState, RegisterKind};
pub use voltage::ResistorModel;

pub mod commands;
pub mod control;
mod error;
mod potentiometer;
pub mod state;
pub mod voltage;
