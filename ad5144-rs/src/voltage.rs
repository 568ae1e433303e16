//! Volts ↔ wiper code conversion.
//!
//! Each channel is wired as a divider from its reference voltage. The wiper
//! contact adds a small series resistance, so code 0 does not give 0 V:
//!
//! ```text
//! code = round(256 / Vref * (V - Vref * Rw / Rab))
//! V    = code * Vref / 256 + Vref * Rw / Rab
//! ```
//!
//! `Rw` is the wiper resistance and `Rab` the end-to-end resistance. The
//! converter does not clamp; a result outside `0..=255` is returned as is.

use crate::commands::{Channel, CHANNEL_COUNT};
use crate::error::CommandError;

/// Default wiper resistance in ohms.
pub const DEFAULT_WIPER_RESISTANCE: u32 = 55;

/// Default end-to-end resistance in ohms (10 kΩ part).
pub const DEFAULT_END_TO_END_RESISTANCE: u32 = 10_000;

/// Default reference voltage per channel.
pub const DEFAULT_REFERENCES: [f32; CHANNEL_COUNT] = [0.4, 0.4, 0.4, 1.24];

/// Steps across the full resistor string.
const FULL_SCALE: f32 = 256.0;

/// Resistor-divider model used for voltage targeting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResistorModel {
    /// Wiper (parasitic) resistance, ohms.
    pub wiper_resistance: u32,
    /// End-to-end resistance, ohms.
    pub end_to_end_resistance: u32,
    /// Full-scale reference voltage, per channel.
    pub references: [f32; CHANNEL_COUNT],
}

impl Default for ResistorModel {
    fn default() -> Self {
        Self {
            wiper_resistance: DEFAULT_WIPER_RESISTANCE,
            end_to_end_resistance: DEFAULT_END_TO_END_RESISTANCE,
            references: DEFAULT_REFERENCES,
        }
    }
}

impl ResistorModel {
    /// Reference voltage of a single wiper.
    ///
    /// # Errors
    /// [`CommandError::InvalidChannel`] for [`Channel::All`].
    pub fn reference(&self, channel: Channel) -> Result<f32, CommandError> {
        channel
            .index()
            .map(|i| self.references[i])
            .ok_or(CommandError::InvalidChannel)
    }

    /// Voltage contributed by the wiper resistance alone.
    fn offset(&self, reference: f32) -> Result<f32, CommandError> {
        if self.end_to_end_resistance == 0 {
            return Err(CommandError::InvalidOperand);
        }
        Ok(reference * self.wiper_resistance as f32 / self.end_to_end_resistance as f32)
    }

    /// Code that produces `volts` on `channel`.
    ///
    /// The result may fall outside `0..=255`: at 0 V the offset term makes
    /// it slightly negative.
    ///
    /// # Errors
    /// * [`CommandError::InvalidChannel`] for [`Channel::All`].
    /// * [`CommandError::OutOfRange`] unless `0 <= volts <= reference`.
    /// * [`CommandError::InvalidOperand`] if the reference is not positive
    ///   or the end-to-end resistance is zero.
    pub fn voltage_to_code(&self, channel: Channel, volts: f32) -> Result<i16, CommandError> {
        let reference = self.reference(channel)?;
        if !(reference > 0.0) {
            return Err(CommandError::InvalidOperand);
        }
        if !(0.0..=reference).contains(&volts) {
            return Err(CommandError::OutOfRange);
        }
        let offset = self.offset(reference)?;
        Ok(round_half_away(FULL_SCALE / reference * (volts - offset)))
    }

    /// Voltage produced on `channel` by wiper code `code`.
    ///
    /// # Errors
    /// * [`CommandError::InvalidChannel`] for [`Channel::All`].
    /// * [`CommandError::InvalidOperand`] if the end-to-end resistance is zero.
    pub fn code_to_voltage(&self, channel: Channel, code: u8) -> Result<f32, CommandError> {
        let reference = self.reference(channel)?;
        let offset = self.offset(reference)?;
        Ok(f32::from(code) * reference / FULL_SCALE + offset)
    }
}

/// Round to nearest, ties away from zero. `f32::round` needs `std`.
fn round_half_away(x: f32) -> i16 {
    if x >= 0.0 {
        (x + 0.5) as i16
    } else {
        (x - 0.5) as i16
    }
}
