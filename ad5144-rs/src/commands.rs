//! AD5144 instruction set and channel addressing.
//!
//! Every AD5144 command is a two-byte frame:
//! - Byte 1: control nibble (high) | channel address field (low)
//! - Byte 2: data byte (wiper code, register selector or control bits)
//!
//! The catalog below holds the fixed templates. A frame is produced by
//! OR'ing a [`Channel`] field into the opcode and the caller's operand into
//! the data byte: `[OPCODE | channel.field(), OPERAND | value]`.

use crate::error::CommandError;

// ---------------------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------------------

/// Default I2C address (ADDR pins floating / tied per datasheet table).
pub const DEFAULT_ADDRESS: u8 = 0x2B;

/// Number of wipers on the device.
pub const CHANNEL_COUNT: usize = 4;

/// Channel address field that targets all four wipers at once.
pub const ALL_CHANNELS_FIELD: u8 = 0x08;

/// Largest value accepted by the control register write.
pub const CONTROL_MAX: u8 = 0x0F;

// ---------------------------------------------------------------------------
// Channel addressing
// ---------------------------------------------------------------------------

/// A wiper selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// RDAC1.
    Ch0,
    /// RDAC2.
    Ch1,
    /// RDAC3.
    Ch2,
    /// RDAC4.
    Ch3,
    /// Broadcast to all four wipers.
    All,
}

impl Channel {
    /// The four individually addressable wipers, in ascending order.
    pub const SINGLE: [Channel; CHANNEL_COUNT] =
        [Channel::Ch0, Channel::Ch1, Channel::Ch2, Channel::Ch3];

    /// Address field merged into the low nibble of the opcode byte.
    pub const fn field(self) -> u8 {
        match self {
            Channel::Ch0 => 0x00,
            Channel::Ch1 => 0x01,
            Channel::Ch2 => 0x02,
            Channel::Ch3 => 0x03,
            Channel::All => ALL_CHANNELS_FIELD,
        }
    }

    /// Inverse of [`field`](Self::field). Returns `None` for bit patterns
    /// the device does not define.
    pub const fn from_field(field: u8) -> Option<Self> {
        match field {
            0x00 => Some(Channel::Ch0),
            0x01 => Some(Channel::Ch1),
            0x02 => Some(Channel::Ch2),
            0x03 => Some(Channel::Ch3),
            ALL_CHANNELS_FIELD => Some(Channel::All),
            _ => None,
        }
    }

    /// Build a selector from a numeric index: `0..=3` for a single wiper,
    /// `-1` for all of them.
    ///
    /// # Errors
    /// [`CommandError::InvalidChannel`] for any other index.
    pub const fn from_index(index: i8) -> Result<Self, CommandError> {
        match index {
            -1 => Ok(Channel::All),
            0 => Ok(Channel::Ch0),
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            _ => Err(CommandError::InvalidChannel),
        }
    }

    /// Array index of a single wiper, `None` for [`Channel::All`].
    pub const fn index(self) -> Option<usize> {
        match self {
            Channel::Ch0 => Some(0),
            Channel::Ch1 => Some(1),
            Channel::Ch2 => Some(2),
            Channel::Ch3 => Some(3),
            Channel::All => None,
        }
    }

    /// Returns `true` for the broadcast selector.
    pub const fn is_all(self) -> bool {
        matches!(self, Channel::All)
    }
}

// ---------------------------------------------------------------------------
// Command templates
// ---------------------------------------------------------------------------

/// Which channel selectors a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Addressing {
    /// Any single wiper or the broadcast selector.
    Any,
    /// A single wiper only; the device has no broadcast form.
    SingleOnly,
    /// No channel field; the command is device-wide.
    Unaddressed,
}

/// A fixed command template from the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Control nibble, already shifted into the high half of the byte.
    pub opcode: u8,
    /// Baseline data byte (register selector or direction bit).
    pub operand: u8,
    /// Largest caller operand merged into the data byte. Zero for commands
    /// whose data byte is fixed.
    pub max_operand: u8,
    /// Accepted channel selectors.
    pub addressing: Addressing,
}

impl Command {
    const fn new(opcode: u8, operand: u8, max_operand: u8, addressing: Addressing) -> Self {
        Self {
            opcode,
            operand,
            max_operand,
            addressing,
        }
    }
}

/// Write a code straight to the RDAC (wiper moves immediately).
pub const WRITE_RDAC: Command = Command::new(0x10, 0x00, 0xFF, Addressing::Any);

/// Write a code to the input register (staged, no output change).
pub const WRITE_INPUT_REGISTER: Command = Command::new(0x20, 0x00, 0xFF, Addressing::Any);

/// Read back the input register.
pub const READ_INPUT_REGISTER: Command = Command::new(0x30, 0x00, 0x00, Addressing::SingleOnly);

/// Read back the EEPROM (power-up default).
pub const READ_EEPROM: Command = Command::new(0x30, 0x01, 0x00, Addressing::SingleOnly);

/// Read back the control register. The channel field is ignored by the
/// device, so the frame is always `[0x30, 0x02]`.
pub const READ_CONTROL: Command = Command::new(0x30, 0x02, 0x00, Addressing::Unaddressed);

/// Read back the RDAC.
pub const READ_RDAC: Command = Command::new(0x30, 0x03, 0x00, Addressing::SingleOnly);

/// Linear RDAC increment by one step (saturates at full scale).
pub const INCREMENT: Command = Command::new(0x40, 0x01, 0x00, Addressing::Any);

/// Linear RDAC decrement by one step (saturates at zero).
pub const DECREMENT: Command = Command::new(0x40, 0x00, 0x00, Addressing::Any);

/// Logarithmic +6 dB step (doubles the code, saturates at full scale).
pub const PLUS_6DB: Command = Command::new(0x50, 0x01, 0x00, Addressing::Any);

/// Logarithmic -6 dB step (halves the code).
pub const MINUS_6DB: Command = Command::new(0x50, 0x00, 0x00, Addressing::Any);

/// Software LRDAC: copy the input register into the RDAC.
pub const SOFT_UPDATE: Command = Command::new(0x60, 0x00, 0x00, Addressing::Any);

/// Store the current RDAC into EEPROM.
pub const RDAC_TO_EEPROM: Command = Command::new(0x70, 0x01, 0x00, Addressing::SingleOnly);

/// Restore the EEPROM value into the RDAC.
pub const EEPROM_TO_RDAC: Command = Command::new(0x70, 0x00, 0x00, Addressing::SingleOnly);

/// Program one EEPROM cell with an explicit value.
pub const WRITE_EEPROM: Command = Command::new(0x80, 0x00, 0xFF, Addressing::SingleOnly);

/// Software reset: reload every RDAC from EEPROM.
pub const SOFT_RESET: Command = Command::new(0xB0, 0x00, 0x00, Addressing::Unaddressed);

/// Write the 4-bit control register.
pub const WRITE_CONTROL: Command = Command::new(0xD0, 0x00, CONTROL_MAX, Addressing::Unaddressed);

/// A composed two-byte command frame.
pub type Frame = [u8; 2];

/// Compose a frame from a template, a channel selector and an operand.
///
/// The channel field and operand are OR'd in, so bits already present in
/// the template are never cleared. Pure: no bus traffic.
///
/// # Errors
/// * [`CommandError::InvalidChannel`] if `channel` does not match the
///   template's [`Addressing`] (a selector for an unaddressed command, no
///   selector for an addressed one, or [`Channel::All`] for a single-wiper
///   command).
/// * [`CommandError::InvalidOperand`] if `operand > command.max_operand`.
///
/// # Example
/// ```
/// use ad5144_driver::commands::{build_frame, Channel, WRITE_RDAC};
///
/// let frame = build_frame(WRITE_RDAC, Some(Channel::Ch2), 0x7F).unwrap();
/// assert_eq!(frame, [0x12, 0x7F]);
/// ```
pub fn build_frame(
    command: Command,
    channel: Option<Channel>,
    operand: u8,
) -> Result<Frame, CommandError> {
    let field = match (command.addressing, channel) {
        (Addressing::Unaddressed, None) => 0,
        (Addressing::Any, Some(channel)) => channel.field(),
        (Addressing::SingleOnly, Some(channel)) if !channel.is_all() => channel.field(),
        _ => return Err(CommandError::InvalidChannel),
    };

    if operand > command.max_operand {
        return Err(CommandError::InvalidOperand);
    }

    Ok([command.opcode | field, command.operand | operand])
}
