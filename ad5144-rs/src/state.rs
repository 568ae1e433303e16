//! Last-known device state.
//!
//! [`PotState`] is a plain snapshot: nothing in it talks to the bus. The
//! driver updates it after each successful exchange, and callers read it
//! through the `cached_*` accessors when they do not want to pay for a
//! bus round-trip. Every entry starts as `None` (unknown) and returns to
//! `None` whenever the device computes a new value we have not read yet.

use crate::commands::{Channel, Command, CHANNEL_COUNT};
use crate::commands::{READ_EEPROM, READ_INPUT_REGISTER, READ_RDAC};
use crate::commands::{WRITE_EEPROM, WRITE_INPUT_REGISTER, WRITE_RDAC};
use crate::control::ControlRegister;

/// The three per-channel registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterKind {
    /// Live wiper position.
    Rdac,
    /// Staged value, copied to the RDAC on a soft or hardware update.
    InputRegister,
    /// Power-up default stored in EEPROM.
    Eeprom,
}

impl RegisterKind {
    /// Read template for this register.
    pub const fn read_command(self) -> Command {
        match self {
            RegisterKind::Rdac => READ_RDAC,
            RegisterKind::InputRegister => READ_INPUT_REGISTER,
            RegisterKind::Eeprom => READ_EEPROM,
        }
    }

    /// Write template for this register.
    pub const fn write_command(self) -> Command {
        match self {
            RegisterKind::Rdac => WRITE_RDAC,
            RegisterKind::InputRegister => WRITE_INPUT_REGISTER,
            RegisterKind::Eeprom => WRITE_EEPROM,
        }
    }
}

/// Cached value of each register, per channel.
pub type ChannelValues = [Option<u8>; CHANNEL_COUNT];

/// Snapshot of everything the driver has learned about the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotState {
    rdac: ChannelValues,
    input: ChannelValues,
    eeprom: ChannelValues,
    control: Option<ControlRegister>,
}

impl PotState {
    /// Fresh snapshot with every entry unknown.
    pub const fn new() -> Self {
        Self {
            rdac: [None; CHANNEL_COUNT],
            input: [None; CHANNEL_COUNT],
            eeprom: [None; CHANNEL_COUNT],
            control: None,
        }
    }

    /// All four cached values of one register.
    pub fn values(&self, kind: RegisterKind) -> ChannelValues {
        *self.slot(kind)
    }

    /// Cached value of one register on one wiper. `None` for
    /// [`Channel::All`] or when the value is unknown.
    pub fn value(&self, kind: RegisterKind, channel: Channel) -> Option<u8> {
        channel.index().and_then(|i| self.slot(kind)[i])
    }

    /// Last control register read back from the device.
    pub fn control(&self) -> Option<ControlRegister> {
        self.control
    }

    /// Record a complete multi-channel read.
    pub(crate) fn store_all(&mut self, kind: RegisterKind, values: [u8; CHANNEL_COUNT]) {
        *self.slot_mut(kind) = values.map(Some);
    }

    /// Record a value written to `channel` (all four for [`Channel::All`]).
    pub(crate) fn store(&mut self, kind: RegisterKind, channel: Channel, value: Option<u8>) {
        let slot = self.slot_mut(kind);
        match channel.index() {
            Some(i) => slot[i] = value,
            None => *slot = [value; CHANNEL_COUNT],
        }
    }

    /// Forget a register on `channel` (all four for [`Channel::All`]).
    pub(crate) fn invalidate(&mut self, kind: RegisterKind, channel: Channel) {
        self.store(kind, channel, None);
    }

    pub(crate) fn set_control(&mut self, control: ControlRegister) {
        self.control = Some(control);
    }

    fn slot(&self, kind: RegisterKind) -> &ChannelValues {
        match kind {
            RegisterKind::Rdac => &self.rdac,
            RegisterKind::InputRegister => &self.input,
            RegisterKind::Eeprom => &self.eeprom,
        }
    }

    fn slot_mut(&mut self, kind: RegisterKind) -> &mut ChannelValues {
        match kind {
            RegisterKind::Rdac => &mut self.rdac,
            RegisterKind::InputRegister => &mut self.input,
            RegisterKind::Eeprom => &mut self.eeprom,
        }
    }
}
