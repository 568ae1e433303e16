//! Error types for the EEPROM driver.

use core::fmt;

/// Errors that can occur when accessing the EEPROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EepromError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Access would start or end beyond the last memory address.
    AddressOutOfRange,

    /// Page write longer than the device's write buffer.
    WriteTooLong,
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for EepromError<E> {
    fn from(error: E) -> Self {
        EepromError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for EepromError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EepromError::I2c(e) => write!(f, "I2C error: {:?}", e),
            EepromError::AddressOutOfRange => write!(f, "Address outside EEPROM memory"),
            EepromError::WriteTooLong => write!(f, "Page write exceeds write buffer"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EepromError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EepromError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            EepromError::AddressOutOfRange => defmt::write!(f, "Address out of range"),
            EepromError::WriteTooLong => defmt::write!(f, "Write too long"),
        }
    }
}
