//! Blocking driver for 16-bit addressed I2C EEPROMs (24xx64 and friends).
//!
//! Defaults match a 64 kbit part: 8192 bytes behind a 32-byte page
//! buffer. Other sizes are described with an [`EepromConfig`].
//!
//! Whole-memory helpers ([`Eeprom::read_all`], [`Eeprom::fill`],
//! [`Eeprom::erase_random`]) take an `embedded-hal` delay so the
//! self-timed write cycle can be waited out between pages.
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types.

#![cfg_attr(not(test), no_std)]

pub use eeprom::{
    Eeprom, EepromConfig, CAPACITY_64K, DEFAULT_ADDRESS, MAX_PAGE_SIZE, PAGE_SIZE_64K, READ_BATCH,
    WRITE_CYCLE_MS,
};
pub use error::EepromError;

mod eeprom;
mod error;
