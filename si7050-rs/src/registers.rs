//! Si7050 command codes and user register layout.
//!
//! Commands are one or two bytes written before the (optional) read phase.
//! The user register holds the measurement resolution split across bits
//! D7 and D0, and the VDD status flag in D2.

// ---------------------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------------------

/// Fixed I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x40;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Measure temperature, hold master mode (clock stretched until done).
pub const MEASURE_HOLD: [u8; 1] = [0xE3];

/// Software reset.
pub const RESET: [u8; 1] = [0xFE];

/// Write user register 1.
pub const WRITE_USER_REGISTER: u8 = 0xE6;

/// Read user register 1.
pub const READ_USER_REGISTER: [u8; 1] = [0xE7];

/// Read electronic ID, first half.
pub const READ_ID_FIRST: [u8; 2] = [0xFA, 0x0F];

/// Read electronic ID, second half.
pub const READ_ID_SECOND: [u8; 2] = [0xFC, 0xC9];

/// Read firmware revision.
pub const READ_FIRMWARE: [u8; 2] = [0x84, 0xB8];

// ---------------------------------------------------------------------------
// User register
// ---------------------------------------------------------------------------

/// Resolution bit RES1.
const RES1: u8 = 1 << 7;

/// Resolution bit RES0.
const RES0: u8 = 1 << 0;

/// VDD status: set when the supply is below the safe operating level.
const VDDS: u8 = 1 << 2;

/// Temperature conversion resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 14 bits (power-up default).
    #[default]
    Bits14,
    /// 13 bits.
    Bits13,
    /// 12 bits.
    Bits12,
    /// 11 bits.
    Bits11,
}

impl Resolution {
    /// `(RES1, RES0)` encoding: 00 → 14, 01 → 12, 10 → 13, 11 → 11 bits.
    const fn res_bits(self) -> u8 {
        match self {
            Resolution::Bits14 => 0,
            Resolution::Bits12 => RES0,
            Resolution::Bits13 => RES1,
            Resolution::Bits11 => RES1 | RES0,
        }
    }

    /// Number of bits per conversion.
    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Bits14 => 14,
            Resolution::Bits13 => 13,
            Resolution::Bits12 => 12,
            Resolution::Bits11 => 11,
        }
    }

    /// Resolution for a bit count, `None` unless 11..=14.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            14 => Some(Resolution::Bits14),
            13 => Some(Resolution::Bits13),
            12 => Some(Resolution::Bits12),
            11 => Some(Resolution::Bits11),
            _ => None,
        }
    }
}

/// Decoded user register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UserRegister(pub u8);

impl UserRegister {
    /// Measurement resolution.
    pub const fn resolution(self) -> Resolution {
        match (self.0 & RES1 != 0, self.0 & RES0 != 0) {
            (false, false) => Resolution::Bits14,
            (false, true) => Resolution::Bits12,
            (true, false) => Resolution::Bits13,
            (true, true) => Resolution::Bits11,
        }
    }

    /// `true` while the supply voltage is adequate.
    pub const fn power_good(self) -> bool {
        self.0 & VDDS == 0
    }

    /// Same register with the resolution bits replaced; other bits kept.
    pub const fn with_resolution(self, resolution: Resolution) -> Self {
        UserRegister((self.0 & !(RES1 | RES0)) | resolution.res_bits())
    }
}

/// Firmware revision reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareRevision {
    /// Reported as `0xFF`.
    V1_0,
    /// Reported as `0x20`.
    V2_0,
    /// Any other code.
    Unknown(u8),
}

impl From<u8> for FirmwareRevision {
    fn from(code: u8) -> Self {
        match code {
            0xFF => FirmwareRevision::V1_0,
            0x20 => FirmwareRevision::V2_0,
            other => FirmwareRevision::Unknown(other),
        }
    }
}
