//! Error types for the AD5144 driver.

use core::fmt;

/// Input rejected while composing a command, before any bus traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Channel selector not accepted by this operation.
    InvalidChannel,
    /// Operand outside the operation's valid range.
    InvalidOperand,
    /// Requested voltage outside `[0, reference]` for the channel.
    OutOfRange,
}

/// Errors that can occur when driving the potentiometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Channel selector not accepted by this operation (e.g. the broadcast
    /// selector for an EEPROM cell write).
    InvalidChannel,

    /// Operand outside the operation's valid range.
    InvalidOperand,

    /// Requested voltage outside `[0, reference]` for the channel.
    OutOfRange,

    /// Read-back after a write did not match what was written.
    VerificationFailed {
        /// Value written.
        expected: u8,
        /// Value read back.
        found: u8,
    },
}

impl<E> From<CommandError> for PotError<E> {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::InvalidChannel => PotError::InvalidChannel,
            CommandError::InvalidOperand => PotError::InvalidOperand,
            CommandError::OutOfRange => PotError::OutOfRange,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::InvalidChannel => write!(f, "Invalid channel for this command"),
            CommandError::InvalidOperand => write!(f, "Operand out of range for this command"),
            CommandError::OutOfRange => write!(f, "Voltage outside channel reference range"),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for PotError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PotError::I2c(e) => write!(f, "I2C error: {:?}", e),
            PotError::InvalidChannel => write!(f, "Invalid channel for this command"),
            PotError::InvalidOperand => write!(f, "Operand out of range for this command"),
            PotError::OutOfRange => write!(f, "Voltage outside channel reference range"),
            PotError::VerificationFailed { expected, found } => write!(
                f,
                "Verification failed: wrote {:#04x}, read back {:#04x}",
                expected, found
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for PotError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PotError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            PotError::InvalidChannel => defmt::write!(f, "Invalid channel"),
            PotError::InvalidOperand => defmt::write!(f, "Invalid operand"),
            PotError::OutOfRange => defmt::write!(f, "Voltage out of range"),
            PotError::VerificationFailed { expected, found } => {
                defmt::write!(f, "Verification failed: wrote {=u8:#x}, read {=u8:#x}", *expected, *found)
            }
        }
    }
}
