//! Error types for the Si7050 driver.

use core::fmt;

/// Errors that can occur when talking to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Si7050Error<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// User register read back different from what was written.
    VerificationFailed { expected: u8, found: u8 },
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for Si7050Error<E> {
    fn from(error: E) -> Self {
        Si7050Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Si7050Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Si7050Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Si7050Error::VerificationFailed { expected, found } => write!(
                f,
                "User register mismatch: wrote {:#04x}, read back {:#04x}",
                expected, found
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Si7050Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Si7050Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Si7050Error::VerificationFailed { expected, found } => defmt::write!(
                f,
                "User register mismatch: wrote {=u8:#x}, read back {=u8:#x}",
                *expected,
                *found
            ),
        }
    }
}
