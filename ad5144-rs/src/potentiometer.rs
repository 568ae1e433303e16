//! High-level interface for the AD5144 quad digital potentiometer.
//!
//! [`Ad5144`] composes command frames from the catalog in
//! [`commands`](crate::commands), sends them through an address-bound
//! [`I2cDevice`], and keeps a [`PotState`] snapshot of what it has read or
//! written. Operations named `refresh_*` always go to the bus; `cached_*`
//! accessors never do.

use i2c_port::{I2cDevice, Transport};

use crate::commands::{build_frame, Channel, Command, Frame, CHANNEL_COUNT};
use crate::commands::{DECREMENT, EEPROM_TO_RDAC, INCREMENT, MINUS_6DB, PLUS_6DB};
use crate::commands::{RDAC_TO_EEPROM, READ_CONTROL, SOFT_RESET, SOFT_UPDATE, WRITE_CONTROL};
use crate::control::ControlRegister;
use crate::error::PotError;
use crate::state::{ChannelValues, PotState, RegisterKind};
use crate::voltage::ResistorModel;

/// High-level interface for the AD5144 quad digital potentiometer.
///
/// Every operation is one blocking bus exchange (control register writes
/// add a verifying read). Input is validated before anything is sent, and
/// a failed exchange leaves the cached state as it was.
///
/// # Example
///
/// ```no_run
/// use ad5144_driver::{Ad5144, Channel, RegisterKind, DEFAULT_ADDRESS};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) -> Result<(), ()> {
/// // `i2c` is any blocking `embedded-hal` I2C implementation
/// let mut pot = Ad5144::new(i2c, DEFAULT_ADDRESS);
///
/// // Move wiper 2 to mid-scale, then read all four wipers back
/// pot.write(RegisterKind::Rdac, Channel::Ch2, 0x80).map_err(|_| ())?;
/// let wipers = pot.read_all(RegisterKind::Rdac).map_err(|_| ())?;
/// # Ok(())
/// # }
/// ```
pub struct Ad5144<T> {
    device: I2cDevice<T>,
    state: PotState,
    model: ResistorModel,
}

impl<T> Ad5144<T>
where
    T: Transport,
{
    /// Create a driver with the default [`ResistorModel`].
    ///
    /// # Arguments
    /// * `bus` — I2C bus (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x2B)
    pub fn new(bus: T, address: u8) -> Self {
        Self::with_model(bus, address, ResistorModel::default())
    }

    /// Create a driver with an explicit resistor model.
    pub fn with_model(bus: T, address: u8, model: ResistorModel) -> Self {
        Self {
            device: I2cDevice::new(bus, address),
            state: PotState::new(),
            model,
        }
    }

    /// Give the bus back, consuming the driver.
    pub fn release(self) -> T {
        self.device.release()
    }

    // -----------------------------------------------------------------------
    // Bus primitives
    // -----------------------------------------------------------------------

    fn send(&mut self, frame: Frame) -> Result<(), PotError<T::Error>> {
        self.device.write(&frame).map_err(PotError::I2c)
    }

    fn query(&mut self, frame: Frame) -> Result<u8, PotError<T::Error>> {
        self.device.read_byte(&frame).map_err(PotError::I2c)
    }

    fn execute(
        &mut self,
        command: Command,
        channel: Channel,
        operand: u8,
    ) -> Result<(), PotError<T::Error>> {
        let frame = build_frame(command, Some(channel), operand)?;
        self.send(frame)
    }

    // -----------------------------------------------------------------------
    // Per-channel registers
    // -----------------------------------------------------------------------

    /// Read one register from a single wiper.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`]
    /// * [`PotError::I2c`] on communication failure
    pub fn read(
        &mut self,
        kind: RegisterKind,
        channel: Channel,
    ) -> Result<u8, PotError<T::Error>> {
        let frame = build_frame(kind.read_command(), Some(channel), 0)?;
        let value = self.query(frame)?;
        self.state.store(kind, channel, Some(value));
        Ok(value)
    }

    /// Read one register from all four wipers in sequence.
    ///
    /// The device has no broadcast read, so this performs 4 individual
    /// exchanges, channel 0 first.
    ///
    /// # Errors
    /// Returns the first I2C error encountered; no partial results are
    /// returned and the cache is only updated once all four reads succeed.
    pub fn read_all(
        &mut self,
        kind: RegisterKind,
    ) -> Result<[u8; CHANNEL_COUNT], PotError<T::Error>> {
        let mut values = [0u8; CHANNEL_COUNT];

        for (slot, channel) in values.iter_mut().zip(Channel::SINGLE) {
            let frame = build_frame(kind.read_command(), Some(channel), 0)?;
            *slot = self.query(frame).inspect_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::warn!("read_all({}) aborted at {}", kind, channel);
            })?;
        }

        self.state.store_all(kind, values);
        Ok(values)
    }

    /// Write one register.
    ///
    /// [`Channel::All`] is accepted for the RDAC and input register (the
    /// device applies the value to every wiper) but not for
    /// [`RegisterKind::Eeprom`], whose cells can only be programmed one at
    /// a time.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`] on the EEPROM
    /// * [`PotError::I2c`] on communication failure
    pub fn write(
        &mut self,
        kind: RegisterKind,
        channel: Channel,
        value: u8,
    ) -> Result<(), PotError<T::Error>> {
        self.execute(kind.write_command(), channel, value)?;
        self.state.store(kind, channel, Some(value));
        Ok(())
    }

    /// Re-read all four wipers (RDAC).
    pub fn refresh_rdac(&mut self) -> Result<[u8; CHANNEL_COUNT], PotError<T::Error>> {
        self.read_all(RegisterKind::Rdac)
    }

    /// Re-read all four input registers.
    pub fn refresh_input_registers(
        &mut self,
    ) -> Result<[u8; CHANNEL_COUNT], PotError<T::Error>> {
        self.read_all(RegisterKind::InputRegister)
    }

    /// Re-read all four EEPROM defaults.
    pub fn refresh_defaults(&mut self) -> Result<[u8; CHANNEL_COUNT], PotError<T::Error>> {
        self.read_all(RegisterKind::Eeprom)
    }

    /// Program the power-up default of a single wiper.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`]
    /// * [`PotError::I2c`] on communication failure
    pub fn set_default(&mut self, channel: Channel, value: u8) -> Result<(), PotError<T::Error>> {
        self.write(RegisterKind::Eeprom, channel, value)
    }

    // -----------------------------------------------------------------------
    // Device-side updates
    // -----------------------------------------------------------------------
    //
    // The device computes the new RDAC itself (with saturation), so the
    // affected cache entries are dropped rather than guessed.

    /// Step the RDAC up by one code.
    pub fn increment(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(INCREMENT, channel)
    }

    /// Step the RDAC down by one code.
    pub fn decrement(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(DECREMENT, channel)
    }

    /// Double the RDAC code (+6 dB), saturating at full scale.
    pub fn plus_6db(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(PLUS_6DB, channel)
    }

    /// Halve the RDAC code (-6 dB).
    pub fn minus_6db(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(MINUS_6DB, channel)
    }

    /// Copy the input register into the RDAC (software LRDAC).
    pub fn soft_update(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(SOFT_UPDATE, channel)
    }

    /// Restore a wiper's RDAC from its EEPROM default.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`]
    /// * [`PotError::I2c`] on communication failure
    pub fn restore_eeprom_to_rdac(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.step(EEPROM_TO_RDAC, channel)
    }

    /// Store a wiper's current RDAC as its EEPROM default.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`]
    /// * [`PotError::I2c`] on communication failure
    pub fn copy_rdac_to_eeprom(&mut self, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.execute(RDAC_TO_EEPROM, channel, 0)?;
        self.state.invalidate(RegisterKind::Eeprom, channel);
        Ok(())
    }

    fn step(&mut self, command: Command, channel: Channel) -> Result<(), PotError<T::Error>> {
        self.execute(command, channel, 0)?;
        self.state.invalidate(RegisterKind::Rdac, channel);
        Ok(())
    }

    /// Software reset: every wiper reloads its EEPROM default.
    pub fn reset(&mut self) -> Result<(), PotError<T::Error>> {
        let frame = build_frame(SOFT_RESET, None, 0)?;
        self.send(frame)?;
        self.state.invalidate(RegisterKind::Rdac, Channel::All);
        self.state.invalidate(RegisterKind::InputRegister, Channel::All);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Control register
    // -----------------------------------------------------------------------

    /// Read and decode the control register.
    pub fn refresh_control(&mut self) -> Result<ControlRegister, PotError<T::Error>> {
        let frame = build_frame(READ_CONTROL, None, 0)?;
        let control = ControlRegister::decode(self.query(frame)?);
        self.state.set_control(control);
        Ok(control)
    }

    /// Write the control register, then read it back to confirm.
    ///
    /// # Arguments
    /// * `value` — raw register value, 0–15
    ///
    /// # Errors
    /// * [`PotError::InvalidOperand`] if `value > 15`
    /// * [`PotError::VerificationFailed`] if the read-back differs
    /// * [`PotError::I2c`] on communication failure
    ///
    /// # Example
    /// ```ignore
    /// // Enable EEPROM programming and RDAC updates
    /// pot.commit_control(0b0011)?;
    /// ```
    pub fn commit_control(&mut self, value: u8) -> Result<ControlRegister, PotError<T::Error>> {
        let value = ControlRegister::encode(value)?;
        let frame = build_frame(WRITE_CONTROL, None, value)?;
        self.send(frame)?;

        let control = self.refresh_control()?;
        if control.bits() != value {
            #[cfg(feature = "defmt")]
            defmt::warn!("control write not accepted: wrote {=u8}, read {=u8}", value, control.bits());
            return Err(PotError::VerificationFailed {
                expected: value,
                found: control.bits(),
            });
        }
        Ok(control)
    }

    // -----------------------------------------------------------------------
    // Voltage targeting
    // -----------------------------------------------------------------------

    /// Move a single wiper so its output sits at `volts`.
    ///
    /// The code is computed with [`ResistorModel::voltage_to_code`] and
    /// written to the RDAC.
    ///
    /// # Errors
    /// * [`PotError::InvalidChannel`] for [`Channel::All`]
    /// * [`PotError::OutOfRange`] unless `0 <= volts <= reference`
    /// * [`PotError::InvalidOperand`] if the computed code falls outside
    ///   0–255 (possible just above 0 V because of the wiper offset)
    /// * [`PotError::I2c`] on communication failure
    pub fn set_output_voltage(
        &mut self,
        channel: Channel,
        volts: f32,
    ) -> Result<u8, PotError<T::Error>> {
        let code = self.model.voltage_to_code(channel, volts)?;
        let code = u8::try_from(code).map_err(|_| PotError::InvalidOperand)?;
        self.write(RegisterKind::Rdac, channel, code)?;
        Ok(code)
    }

    /// Output voltage of a wiper, from the cached RDAC.
    ///
    /// Returns `Ok(None)` when the RDAC has not been read or written since
    /// it last changed on the device.
    pub fn cached_output_voltage(
        &self,
        channel: Channel,
    ) -> Result<Option<f32>, PotError<T::Error>> {
        match self.state.value(RegisterKind::Rdac, channel) {
            Some(code) => Ok(Some(self.model.code_to_voltage(channel, code)?)),
            None => {
                // Still reject the broadcast selector.
                self.model.reference(channel)?;
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Cached state and configuration (no bus traffic)
    // -----------------------------------------------------------------------

    /// Snapshot of everything read or written so far.
    pub fn state(&self) -> &PotState {
        &self.state
    }

    /// Last known RDAC values.
    pub fn cached_rdac(&self) -> ChannelValues {
        self.state.values(RegisterKind::Rdac)
    }

    /// Last known input register values.
    pub fn cached_input_registers(&self) -> ChannelValues {
        self.state.values(RegisterKind::InputRegister)
    }

    /// Last known EEPROM defaults.
    pub fn cached_defaults(&self) -> ChannelValues {
        self.state.values(RegisterKind::Eeprom)
    }

    /// Last control register read back.
    pub fn cached_control(&self) -> Option<ControlRegister> {
        self.state.control()
    }

    /// Resistor model used for voltage targeting.
    pub fn model(&self) -> &ResistorModel {
        &self.model
    }

    /// Set the wiper resistance, ohms.
    pub fn set_wiper_resistance(&mut self, ohms: u32) {
        self.model.wiper_resistance = ohms;
    }

    /// Set the end-to-end resistance, ohms.
    pub fn set_end_to_end_resistance(&mut self, ohms: u32) {
        self.model.end_to_end_resistance = ohms;
    }

    /// Replace the per-channel reference voltages.
    pub fn set_references(&mut self, references: [f32; CHANNEL_COUNT]) {
        self.model.references = references;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::WiperMode;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x2B;

    fn pot(expectations: &[I2cTransaction]) -> Ad5144<I2cMock> {
        Ad5144::new(I2cMock::new(expectations), ADDR)
    }

    fn write(bytes: [u8; 2]) -> I2cTransaction {
        I2cTransaction::write(ADDR, bytes.to_vec())
    }

    fn read(bytes: [u8; 2], value: u8) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, bytes.to_vec(), vec![value])
    }

    // ── Writes ───────────────────────────────────────────────────────

    #[test]
    fn write_rdac_sends_frame_and_caches() {
        let mut pot = pot(&[write([0x12, 0x7F])]);

        pot.write(RegisterKind::Rdac, Channel::Ch2, 0x7F).unwrap();

        assert_eq!(pot.cached_rdac(), [None, None, Some(0x7F), None]);
        pot.release().done();
    }

    #[test]
    fn broadcast_input_register_write() {
        let mut pot = pot(&[write([0x28, 0x40])]);

        pot.write(RegisterKind::InputRegister, Channel::All, 0x40).unwrap();

        assert_eq!(pot.cached_input_registers(), [Some(0x40); 4]);
        pot.release().done();
    }

    #[test]
    fn eeprom_write_rejects_broadcast_without_bus_traffic() {
        let mut pot = pot(&[]);

        assert_eq!(pot.set_default(Channel::All, 0x10), Err(PotError::InvalidChannel));
        assert_eq!(
            pot.write(RegisterKind::Eeprom, Channel::All, 0x10),
            Err(PotError::InvalidChannel)
        );
        pot.release().done();
    }

    #[test]
    fn eeprom_write_single_channel() {
        let mut pot = pot(&[write([0x83, 0x99])]);

        pot.set_default(Channel::Ch3, 0x99).unwrap();

        assert_eq!(pot.cached_defaults(), [None, None, None, Some(0x99)]);
        pot.release().done();
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let mut pot = pot(&[
            write([0x10, 0x20]),
            write([0x10, 0x30]).with_error(ErrorKind::Other),
        ]);

        pot.write(RegisterKind::Rdac, Channel::Ch0, 0x20).unwrap();
        assert_eq!(
            pot.write(RegisterKind::Rdac, Channel::Ch0, 0x30),
            Err(PotError::I2c(ErrorKind::Other))
        );

        assert_eq!(pot.cached_rdac()[0], Some(0x20));
        pot.release().done();
    }

    // ── Reads ────────────────────────────────────────────────────────

    #[test]
    fn read_all_queries_each_channel_in_order() {
        let mut pot = pot(&[
            read([0x30, 0x03], 0x00),
            read([0x31, 0x03], 0x40),
            read([0x32, 0x03], 0x80),
            read([0x33, 0x03], 0xFF),
        ]);

        assert_eq!(pot.refresh_rdac(), Ok([0x00, 0x40, 0x80, 0xFF]));
        assert_eq!(pot.cached_rdac(), [Some(0x00), Some(0x40), Some(0x80), Some(0xFF)]);
        pot.release().done();
    }

    #[test]
    fn read_all_input_and_eeprom_select_register() {
        let mut pot = pot(&[
            read([0x30, 0x00], 1),
            read([0x31, 0x00], 2),
            read([0x32, 0x00], 3),
            read([0x33, 0x00], 4),
            read([0x30, 0x01], 5),
            read([0x31, 0x01], 6),
            read([0x32, 0x01], 7),
            read([0x33, 0x01], 8),
        ]);

        assert_eq!(pot.refresh_input_registers(), Ok([1, 2, 3, 4]));
        assert_eq!(pot.refresh_defaults(), Ok([5, 6, 7, 8]));
        pot.release().done();
    }

    #[test]
    fn read_all_aborts_on_first_failure_and_keeps_old_cache() {
        let mut pot = pot(&[
            write([0x13, 0x55]),
            read([0x30, 0x03], 0x11),
            I2cTransaction::write_read(ADDR, vec![0x31, 0x03], vec![0x00])
                .with_error(ErrorKind::Other),
        ]);

        pot.write(RegisterKind::Rdac, Channel::Ch3, 0x55).unwrap();
        assert_eq!(
            pot.read_all(RegisterKind::Rdac),
            Err(PotError::I2c(ErrorKind::Other))
        );

        // Channel 0 was read successfully but the aborted call stores nothing.
        assert_eq!(pot.cached_rdac(), [None, None, None, Some(0x55)]);
        pot.release().done();
    }

    #[test]
    fn single_read_updates_one_channel() {
        let mut pot = pot(&[read([0x31, 0x01], 0x22)]);

        assert_eq!(pot.read(RegisterKind::Eeprom, Channel::Ch1), Ok(0x22));
        assert_eq!(pot.cached_defaults(), [None, Some(0x22), None, None]);
        pot.release().done();
    }

    #[test]
    fn single_read_rejects_broadcast() {
        let mut pot = pot(&[]);
        assert_eq!(pot.read(RegisterKind::Rdac, Channel::All), Err(PotError::InvalidChannel));
        pot.release().done();
    }

    // ── Device-side updates ──────────────────────────────────────────

    #[test]
    fn steps_accept_broadcast_and_invalidate_rdac() {
        let mut pot = pot(&[
            write([0x18, 0x10]),
            write([0x48, 0x01]),
            write([0x11, 0x20]),
            write([0x41, 0x00]),
            write([0x52, 0x01]),
            write([0x58, 0x00]),
        ]);

        pot.write(RegisterKind::Rdac, Channel::All, 0x10).unwrap();
        pot.increment(Channel::All).unwrap();
        assert_eq!(pot.cached_rdac(), [None; 4]);

        pot.write(RegisterKind::Rdac, Channel::Ch1, 0x20).unwrap();
        pot.decrement(Channel::Ch1).unwrap();
        assert_eq!(pot.cached_rdac()[1], None);

        pot.plus_6db(Channel::Ch2).unwrap();
        pot.minus_6db(Channel::All).unwrap();
        pot.release().done();
    }

    #[test]
    fn soft_update_frame() {
        let mut pot = pot(&[write([0x60, 0x00]), write([0x68, 0x00])]);

        pot.soft_update(Channel::Ch0).unwrap();
        pot.soft_update(Channel::All).unwrap();
        pot.release().done();
    }

    #[test]
    fn eeprom_transfers_are_single_channel() {
        let mut pot = pot(&[
            read([0x32, 0x01], 0x44),
            write([0x72, 0x01]),
            write([0x72, 0x00]),
        ]);

        pot.read(RegisterKind::Eeprom, Channel::Ch2).unwrap();
        pot.copy_rdac_to_eeprom(Channel::Ch2).unwrap();
        assert_eq!(pot.cached_defaults()[2], None);

        pot.restore_eeprom_to_rdac(Channel::Ch2).unwrap();
        assert_eq!(pot.copy_rdac_to_eeprom(Channel::All), Err(PotError::InvalidChannel));
        assert_eq!(pot.restore_eeprom_to_rdac(Channel::All), Err(PotError::InvalidChannel));
        pot.release().done();
    }

    #[test]
    fn reset_invalidates_wipers_and_inputs() {
        let mut pot = pot(&[write([0x20, 0x05]), write([0xB0, 0x00])]);

        pot.write(RegisterKind::InputRegister, Channel::Ch0, 0x05).unwrap();
        pot.reset().unwrap();

        assert_eq!(pot.cached_input_registers(), [None; 4]);
        assert_eq!(pot.cached_rdac(), [None; 4]);
        pot.release().done();
    }

    // ── Control register ─────────────────────────────────────────────

    #[test]
    fn refresh_control_decodes_and_caches() {
        let mut pot = pot(&[read([0x30, 0x02], 0x07)]);

        let control = pot.refresh_control().unwrap();
        assert!(control.write_protect);
        assert!(control.eeprom_program_enable);
        assert_eq!(control.mode, WiperMode::LinearGain);
        assert!(!control.burst_mode);
        assert_eq!(pot.cached_control(), Some(control));
        pot.release().done();
    }

    #[test]
    fn commit_control_verifies_read_back() {
        let mut pot = pot(&[write([0xD0, 0x09]), read([0x30, 0x02], 0x09)]);

        let control = pot.commit_control(9).unwrap();
        assert_eq!(control.bits(), 9);
        pot.release().done();
    }

    #[test]
    fn commit_control_mismatch_fails_verification() {
        let mut pot = pot(&[write([0xD0, 0x09]), read([0x30, 0x02], 0x01)]);

        assert_eq!(
            pot.commit_control(9),
            Err(PotError::VerificationFailed {
                expected: 0x09,
                found: 0x01
            })
        );
        pot.release().done();
    }

    #[test]
    fn commit_control_rejects_wide_values_without_bus_traffic() {
        let mut pot = pot(&[]);
        assert_eq!(pot.commit_control(16), Err(PotError::InvalidOperand));
        pot.release().done();
    }

    // ── Voltage targeting ────────────────────────────────────────────

    #[test]
    fn set_output_voltage_writes_computed_code() {
        let mut pot = pot(&[write([0x12, 0x7F])]);

        assert_eq!(pot.set_output_voltage(Channel::Ch2, 0.2), Ok(0x7F));
        let volts = pot.cached_output_voltage(Channel::Ch2).unwrap().unwrap();
        assert!((volts - 0.2).abs() < 0.002);
        pot.release().done();
    }

    #[test]
    fn set_output_voltage_validates_before_sending() {
        let mut pot = pot(&[]);

        assert_eq!(pot.set_output_voltage(Channel::All, 0.2), Err(PotError::InvalidChannel));
        assert_eq!(pot.set_output_voltage(Channel::Ch0, 0.5), Err(PotError::OutOfRange));
        // 0 V maps to code -1 with the default wiper resistance.
        assert_eq!(pot.set_output_voltage(Channel::Ch0, 0.0), Err(PotError::InvalidOperand));
        pot.release().done();
    }

    #[test]
    fn model_setters_change_conversion() {
        let mut pot = pot(&[write([0x13, 0x80])]);
        pot.set_wiper_resistance(0);
        pot.set_end_to_end_resistance(100_000);
        pot.set_references([1.0, 1.0, 1.0, 2.0]);

        assert_eq!(pot.set_output_voltage(Channel::Ch3, 1.0), Ok(0x80));
        assert_eq!(pot.model().end_to_end_resistance, 100_000);
        pot.release().done();
    }

    #[test]
    fn cached_output_voltage_unknown_until_read() {
        let pot = pot(&[]);
        assert_eq!(pot.cached_output_voltage(Channel::Ch0), Ok(None));
        assert_eq!(pot.cached_output_voltage(Channel::All), Err(PotError::InvalidChannel));
        pot.release().done();
    }
}
