//! High-level Si7050 driver.

use i2c_port::{I2cDevice, Transport};

use crate::error::Si7050Error;
use crate::registers::{
    FirmwareRevision, Resolution, UserRegister, MEASURE_HOLD, READ_FIRMWARE, READ_ID_FIRST,
    READ_ID_SECOND, READ_USER_REGISTER, RESET, WRITE_USER_REGISTER,
};

/// Temperature span of the conversion formula, in °C.
const TEMPERATURE_SPAN: f32 = 175.72;

/// Temperature offset of the conversion formula, in °C.
const TEMPERATURE_OFFSET: f32 = 46.85;

/// Blocking driver for one Si7050 temperature sensor.
///
/// Measurements use hold master mode: the sensor stretches the clock
/// until the conversion is ready, so a reading is a single exchange.
///
/// The electronic serial number and firmware revision never change, so
/// they are fetched once and then served from memory.
///
/// # Example
///
/// ```no_run
/// use si7050_driver::{Resolution, Si7050, DEFAULT_ADDRESS};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) -> Result<(), ()> {
/// let mut sensor = Si7050::new(i2c, DEFAULT_ADDRESS);
///
/// sensor.set_resolution(Resolution::Bits12).map_err(|_| ())?;
/// let celsius = sensor.temperature().map_err(|_| ())?;
/// # Ok(())
/// # }
/// ```
pub struct Si7050<T> {
    device: I2cDevice<T>,
    serial_number: Option<[u8; 8]>,
    firmware: Option<FirmwareRevision>,
}

impl<T> Si7050<T>
where
    T: Transport,
{
    /// Create a driver for the sensor at `address`.
    ///
    /// No bus traffic is generated.
    pub fn new(bus: T, address: u8) -> Self {
        Self {
            device: I2cDevice::new(bus, address),
            serial_number: None,
            firmware: None,
        }
    }

    /// Give the bus back, consuming the driver.
    pub fn release(self) -> T {
        self.device.release()
    }

    // -----------------------------------------------------------------------
    // Measurement
    // -----------------------------------------------------------------------

    /// Raw 16-bit conversion result.
    pub fn read_raw(&mut self) -> Result<u16, Si7050Error<T::Error>> {
        let mut buf = [0u8; 2];
        self.device.write_read(&MEASURE_HOLD, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Measure the temperature in °C.
    pub fn temperature(&mut self) -> Result<f32, Si7050Error<T::Error>> {
        Ok(celsius(self.read_raw()?))
    }

    /// Measure the temperature, rounded to the nearest whole degree.
    ///
    /// Halves round away from zero.
    pub fn temperature_rounded(&mut self) -> Result<i16, Si7050Error<T::Error>> {
        Ok(round_half_away(self.temperature()?))
    }

    /// Software reset. The user register returns to its power-up value.
    pub fn reset(&mut self) -> Result<(), Si7050Error<T::Error>> {
        self.device.write(&RESET)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // User register
    // -----------------------------------------------------------------------

    /// Read the user register.
    pub fn user_register(&mut self) -> Result<UserRegister, Si7050Error<T::Error>> {
        Ok(UserRegister(self.device.read_byte(&READ_USER_REGISTER)?))
    }

    /// Current measurement resolution.
    pub fn resolution(&mut self) -> Result<Resolution, Si7050Error<T::Error>> {
        Ok(self.user_register()?.resolution())
    }

    /// Change the measurement resolution.
    ///
    /// Reads the user register, replaces the resolution bits, writes it
    /// back and re-reads it.
    ///
    /// # Errors
    /// * [`Si7050Error::VerificationFailed`] if the re-read differs
    /// * [`Si7050Error::I2c`] on communication failure
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Si7050Error<T::Error>> {
        let target = self.user_register()?.with_resolution(resolution);
        self.device.write(&[WRITE_USER_REGISTER, target.0])?;

        let found = self.user_register()?;
        if found != target {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Si7050 user register mismatch: wrote {=u8:#x}, read {=u8:#x}",
                target.0,
                found.0
            );
            return Err(Si7050Error::VerificationFailed {
                expected: target.0,
                found: found.0,
            });
        }
        Ok(())
    }

    /// `true` while the supply voltage is above the sensor's minimum.
    pub fn power_good(&mut self) -> Result<bool, Si7050Error<T::Error>> {
        Ok(self.user_register()?.power_good())
    }

    // -----------------------------------------------------------------------
    // Identification
    // -----------------------------------------------------------------------

    /// Electronic serial number, fetched on first call.
    ///
    /// Bytes are in device order: four from the first ID read followed by
    /// four from the second.
    pub fn serial_number(&mut self) -> Result<[u8; 8], Si7050Error<T::Error>> {
        if let Some(serial) = self.serial_number {
            return Ok(serial);
        }

        let mut serial = [0u8; 8];
        let (first, second) = serial.split_at_mut(4);
        self.device.write_read(&READ_ID_FIRST, first)?;
        self.device.write_read(&READ_ID_SECOND, second)?;

        self.serial_number = Some(serial);
        Ok(serial)
    }

    /// Firmware revision, fetched on first call.
    pub fn firmware_revision(&mut self) -> Result<FirmwareRevision, Si7050Error<T::Error>> {
        if let Some(firmware) = self.firmware {
            return Ok(firmware);
        }

        let firmware = FirmwareRevision::from(self.device.read_byte(&READ_FIRMWARE)?);
        #[cfg(feature = "defmt")]
        defmt::debug!("Si7050 firmware: {}", firmware);

        self.firmware = Some(firmware);
        Ok(firmware)
    }
}

/// Convert a raw conversion result to °C.
pub fn celsius(code: u16) -> f32 {
    TEMPERATURE_SPAN * f32::from(code) / 65536.0 - TEMPERATURE_OFFSET
}

fn round_half_away(value: f32) -> i16 {
    if value >= 0.0 {
        (value + 0.5) as i16
    } else {
        (value - 0.5) as i16
    }
}
