//! The AD5144 4-bit control register.
//!
//! ```text
//! bit 3  C3  I2C burst mode
//! bit 2  C2  mode: 0 = potentiometer, 1 = linear gain setting
//! bit 1  C1  EEPROM program enable
//! bit 0  C0  RDAC write protect
//! ```
//!
//! Bits 7..4 of the read-back byte are not part of the register and are
//! ignored on decode.

use crate::commands::CONTROL_MAX;
use crate::error::CommandError;

const WRITE_PROTECT: u8 = 1 << 0;
const EEPROM_PROGRAM_ENABLE: u8 = 1 << 1;
const MODE: u8 = 1 << 2;
const BURST_MODE: u8 = 1 << 3;

/// Wiper operating mode (control bit C2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiperMode {
    /// Both halves of the wiper move together.
    #[default]
    Potentiometer,
    /// RAW and RWB are set independently.
    LinearGain,
}

/// Decoded view of the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegister {
    /// C0: RDAC write protect bit, as stored by the device.
    pub write_protect: bool,
    /// C1: EEPROM program enable.
    pub eeprom_program_enable: bool,
    /// C2: potentiometer / linear gain mode.
    pub mode: WiperMode,
    /// C3: I2C burst mode.
    pub burst_mode: bool,
}

impl ControlRegister {
    /// Decode a read-back byte by fixed bit positions.
    pub const fn decode(byte: u8) -> Self {
        Self {
            write_protect: byte & WRITE_PROTECT != 0,
            eeprom_program_enable: byte & EEPROM_PROGRAM_ENABLE != 0,
            mode: if byte & MODE != 0 {
                WiperMode::LinearGain
            } else {
                WiperMode::Potentiometer
            },
            burst_mode: byte & BURST_MODE != 0,
        }
    }

    /// Validate a raw register value for writing.
    ///
    /// # Errors
    /// [`CommandError::InvalidOperand`] if `value > 15`.
    pub const fn encode(value: u8) -> Result<u8, CommandError> {
        if value > CONTROL_MAX {
            Err(CommandError::InvalidOperand)
        } else {
            Ok(value)
        }
    }

    /// Pack the fields back into the register nibble.
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.write_protect {
            bits |= WRITE_PROTECT;
        }
        if self.eeprom_program_enable {
            bits |= EEPROM_PROGRAM_ENABLE;
        }
        if matches!(self.mode, WiperMode::LinearGain) {
            bits |= MODE;
        }
        if self.burst_mode {
            bits |= BURST_MODE;
        }
        bits
    }
}

impl From<ControlRegister> for u8 {
    fn from(register: ControlRegister) -> u8 {
        register.bits()
    }
}
