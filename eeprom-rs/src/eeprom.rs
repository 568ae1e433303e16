//! 16-bit addressed I2C EEPROM access.
//!
//! Every transfer starts with the memory address, high byte first:
//! `[addr_hi, addr_lo, data...]` for writes, `[addr_hi, addr_lo]` followed
//! by a read for reads. After each write the device is busy for up to
//! [`WRITE_CYCLE_MS`] while it programs the cells.

use embedded_hal::delay::DelayNs;
use i2c_port::{I2cDevice, Transport};
use rand_core::RngCore;

use crate::error::EepromError;

/// Default I2C address (A2..A0 tied low).
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Capacity of a 64 kbit part, in bytes.
pub const CAPACITY_64K: usize = 64 * 1024 / 8;

/// Page write buffer of a 64 kbit part, in bytes.
pub const PAGE_SIZE_64K: usize = 32;

/// Largest page buffer this driver can stage.
pub const MAX_PAGE_SIZE: usize = 64;

/// Self-timed write cycle, in milliseconds.
pub const WRITE_CYCLE_MS: u32 = 5;

/// Bytes fetched per exchange by [`Eeprom::read_all`].
pub const READ_BATCH: usize = 255;

/// Geometry of the attached part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromConfig {
    /// Total memory, in bytes.
    pub capacity: usize,
    /// Page write buffer, in bytes. Capped at [`MAX_PAGE_SIZE`].
    pub page_size: usize,
}

impl Default for EepromConfig {
    fn default() -> Self {
        Self {
            capacity: CAPACITY_64K,
            page_size: PAGE_SIZE_64K,
        }
    }
}

/// Blocking driver for a 16-bit addressed I2C EEPROM.
///
/// # Example
///
/// ```no_run
/// use eeprom_driver::{Eeprom, DEFAULT_ADDRESS};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) -> Result<(), ()> {
/// let mut eeprom = Eeprom::new(i2c, DEFAULT_ADDRESS);
///
/// eeprom.write_byte(0x0010, 0xA5).map_err(|_| ())?;
/// let value = eeprom.read_byte(0x0010).map_err(|_| ())?;
/// # Ok(())
/// # }
/// ```
pub struct Eeprom<T> {
    device: I2cDevice<T>,
    config: EepromConfig,
}

impl<T> Eeprom<T>
where
    T: Transport,
{
    /// Create a driver for a 64 kbit part.
    pub fn new(bus: T, address: u8) -> Self {
        Self::with_config(bus, address, EepromConfig::default())
    }

    /// Create a driver for a part with different geometry.
    pub fn with_config(bus: T, address: u8, config: EepromConfig) -> Self {
        Self {
            device: I2cDevice::new(bus, address),
            config,
        }
    }

    /// Part geometry.
    pub fn config(&self) -> &EepromConfig {
        &self.config
    }

    /// Give the bus back, consuming the driver.
    pub fn release(self) -> T {
        self.device.release()
    }

    fn check_range(&self, address: u16, len: usize) -> Result<(), EepromError<T::Error>> {
        if usize::from(address) + len.max(1) > self.config.capacity {
            return Err(EepromError::AddressOutOfRange);
        }
        Ok(())
    }

    fn page_limit(&self) -> usize {
        self.config.page_size.min(MAX_PAGE_SIZE)
    }

    // -----------------------------------------------------------------------
    // Single bytes
    // -----------------------------------------------------------------------

    /// Program one byte.
    ///
    /// # Errors
    /// * [`EepromError::AddressOutOfRange`] past the end of memory
    /// * [`EepromError::I2c`] on communication failure
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), EepromError<T::Error>> {
        self.check_range(address, 1)?;
        let [hi, lo] = address.to_be_bytes();
        self.device.write(&[hi, lo, value])?;
        Ok(())
    }

    /// Read one byte.
    ///
    /// # Errors
    /// * [`EepromError::AddressOutOfRange`] past the end of memory
    /// * [`EepromError::I2c`] on communication failure
    pub fn read_byte(&mut self, address: u16) -> Result<u8, EepromError<T::Error>> {
        self.check_range(address, 1)?;
        Ok(self.device.read_byte(&address.to_be_bytes())?)
    }

    // -----------------------------------------------------------------------
    // Pages and ranges
    // -----------------------------------------------------------------------

    /// Program up to one page buffer of bytes starting at `address`.
    ///
    /// The caller is responsible for not crossing a physical page boundary;
    /// the device wraps within the page if it does.
    ///
    /// # Errors
    /// * [`EepromError::WriteTooLong`] if `data` exceeds the page buffer
    /// * [`EepromError::AddressOutOfRange`] if the write runs past memory
    /// * [`EepromError::I2c`] on communication failure
    pub fn write_page(&mut self, address: u16, data: &[u8]) -> Result<(), EepromError<T::Error>> {
        if data.len() > self.page_limit() {
            return Err(EepromError::WriteTooLong);
        }
        self.check_range(address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        // Full write buffer: [addr_hi, addr_lo, d0, d1, ...]
        let mut buf = [0u8; 2 + MAX_PAGE_SIZE];
        buf[0..2].copy_from_slice(&address.to_be_bytes());
        buf[2..2 + data.len()].copy_from_slice(data);

        self.device.write(&buf[..2 + data.len()])?;
        Ok(())
    }

    /// Sequential read into `buffer` starting at `address`.
    ///
    /// # Errors
    /// * [`EepromError::AddressOutOfRange`] if the read runs past memory
    /// * [`EepromError::I2c`] on communication failure
    pub fn read_into(
        &mut self,
        address: u16,
        buffer: &mut [u8],
    ) -> Result<(), EepromError<T::Error>> {
        self.check_range(address, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.device.write_read(&address.to_be_bytes(), buffer)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Whole-memory operations
    // -----------------------------------------------------------------------

    /// Read memory from address 0 into `buffer`, [`READ_BATCH`] bytes at a
    /// time, pausing one write cycle between batches.
    ///
    /// `buffer` may be shorter than the part; pass a capacity-sized buffer
    /// to dump everything.
    ///
    /// # Errors
    /// Returns the first I2C error encountered; bytes already read stay in
    /// `buffer`.
    pub fn read_all<D: DelayNs>(
        &mut self,
        buffer: &mut [u8],
        delay: &mut D,
    ) -> Result<(), EepromError<T::Error>> {
        if buffer.len() > self.config.capacity {
            return Err(EepromError::AddressOutOfRange);
        }
        for (i, chunk) in buffer.chunks_mut(READ_BATCH).enumerate() {
            let Ok(address) = u16::try_from(i * READ_BATCH) else {
                return Err(EepromError::AddressOutOfRange);
            };
            self.read_into(address, chunk)?;
            delay.delay_ms(WRITE_CYCLE_MS);
        }
        Ok(())
    }

    /// Overwrite the whole memory with `value`.
    pub fn fill<D: DelayNs>(&mut self, value: u8, delay: &mut D) -> Result<(), EepromError<T::Error>> {
        self.erase_with(delay, |chunk| chunk.fill(value))
    }

    /// Overwrite the whole memory with random bytes from `rng`.
    pub fn erase_random<R, D>(&mut self, rng: &mut R, delay: &mut D) -> Result<(), EepromError<T::Error>>
    where
        R: RngCore,
        D: DelayNs,
    {
        self.erase_with(delay, |chunk| rng.fill_bytes(chunk))
    }

    /// Page-by-page overwrite, waiting out the write cycle after each page.
    fn erase_with<D, F>(&mut self, delay: &mut D, mut pattern: F) -> Result<(), EepromError<T::Error>>
    where
        D: DelayNs,
        F: FnMut(&mut [u8]),
    {
        let page = self.page_limit().max(1);
        let mut buf = [0u8; MAX_PAGE_SIZE];
        let mut offset = 0;

        while offset < self.config.capacity {
            let len = page.min(self.config.capacity - offset);
            let chunk = &mut buf[..len];
            pattern(chunk);

            let Ok(address) = u16::try_from(offset) else {
                return Err(EepromError::AddressOutOfRange);
            };
            self.write_page(address, chunk)?;
            delay.delay_ms(WRITE_CYCLE_MS);

            offset += len;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("EEPROM overwritten: {=usize} bytes", self.config.capacity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x50;

    fn eeprom(expectations: &[I2cTransaction]) -> Eeprom<I2cMock> {
        Eeprom::new(I2cMock::new(expectations), ADDR)
    }

    fn small(expectations: &[I2cTransaction]) -> Eeprom<I2cMock> {
        let config = EepromConfig {
            capacity: 40,
            page_size: 16,
        };
        Eeprom::with_config(I2cMock::new(expectations), ADDR, config)
    }

    /// Deterministic byte source for erase tests.
    struct CountingRng(u8);

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            rand_core::impls::next_u32_via_fill(self)
        }
        fn next_u64(&mut self) -> u64 {
            rand_core::impls::next_u64_via_fill(self)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.0;
                self.0 = self.0.wrapping_add(1);
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn default_geometry_is_64_kbit() {
        let eeprom = eeprom(&[]);
        assert_eq!(eeprom.config().capacity, 8192);
        assert_eq!(eeprom.config().page_size, 32);
        eeprom.release().done();
    }

    #[test]
    fn write_byte_prefixes_big_endian_address() {
        let mut eeprom = eeprom(&[I2cTransaction::write(ADDR, vec![0x01, 0x23, 0xAB])]);
        eeprom.write_byte(0x0123, 0xAB).unwrap();
        eeprom.release().done();
    }

    #[test]
    fn read_byte_at_last_address() {
        let mut eeprom = eeprom(&[I2cTransaction::write_read(ADDR, vec![0x1F, 0xFF], vec![0x42])]);
        assert_eq!(eeprom.read_byte(0x1FFF), Ok(0x42));
        eeprom.release().done();
    }

    #[test]
    fn access_past_end_is_rejected_without_traffic() {
        let mut eeprom = eeprom(&[]);
        assert_eq!(eeprom.write_byte(0x2000, 0), Err(EepromError::AddressOutOfRange));
        assert_eq!(eeprom.read_byte(0x2000), Err(EepromError::AddressOutOfRange));
        let mut buf = [0u8; 4];
        assert_eq!(eeprom.read_into(0x1FFE, &mut buf), Err(EepromError::AddressOutOfRange));
        assert_eq!(eeprom.write_page(0x1FFE, &[1, 2, 3]), Err(EepromError::AddressOutOfRange));
        eeprom.release().done();
    }

    #[test]
    fn write_page_sends_address_and_data() {
        let mut eeprom = eeprom(&[I2cTransaction::write(ADDR, vec![0x00, 0x20, 1, 2, 3])]);
        eeprom.write_page(0x0020, &[1, 2, 3]).unwrap();
        eeprom.release().done();
    }

    #[test]
    fn write_page_rejects_more_than_one_buffer() {
        let mut eeprom = eeprom(&[]);
        assert_eq!(eeprom.write_page(0, &[0u8; 33]), Err(EepromError::WriteTooLong));
        eeprom.release().done();
    }

    #[test]
    fn read_into_fills_buffer() {
        let mut eeprom = eeprom(&[I2cTransaction::write_read(
            ADDR,
            vec![0x10, 0x00],
            vec![9, 8, 7],
        )]);
        let mut buf = [0u8; 3];
        eeprom.read_into(0x1000, &mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
        eeprom.release().done();
    }

    #[test]
    fn bus_error_is_propagated() {
        let mut eeprom = eeprom(&[
            I2cTransaction::write(ADDR, vec![0x00, 0x00, 0x01]).with_error(ErrorKind::Other)
        ]);
        assert_eq!(eeprom.write_byte(0, 1), Err(EepromError::I2c(ErrorKind::Other)));
        eeprom.release().done();
    }

    #[test]
    fn fill_writes_every_page_including_the_short_tail() {
        let mut eeprom = small(&[
            I2cTransaction::write(ADDR, [vec![0x00, 0x00], vec![0xFF; 16]].concat()),
            I2cTransaction::write(ADDR, [vec![0x00, 0x10], vec![0xFF; 16]].concat()),
            I2cTransaction::write(ADDR, [vec![0x00, 0x20], vec![0xFF; 8]].concat()),
        ]);
        eeprom.fill(0xFF, &mut NoopDelay::new()).unwrap();
        eeprom.release().done();
    }

    #[test]
    fn erase_random_uses_rng_bytes() {
        let first: Vec<u8> = (0..16).collect();
        let second: Vec<u8> = (16..32).collect();
        let third: Vec<u8> = (32..40).collect();
        let mut eeprom = small(&[
            I2cTransaction::write(ADDR, [vec![0x00, 0x00], first].concat()),
            I2cTransaction::write(ADDR, [vec![0x00, 0x10], second].concat()),
            I2cTransaction::write(ADDR, [vec![0x00, 0x20], third].concat()),
        ]);
        eeprom.erase_random(&mut CountingRng(0), &mut NoopDelay::new()).unwrap();
        eeprom.release().done();
    }

    #[test]
    fn erase_stops_at_first_failure() {
        let mut eeprom = small(&[
            I2cTransaction::write(ADDR, [vec![0x00, 0x00], vec![0x00; 16]].concat())
                .with_error(ErrorKind::Other),
        ]);
        assert_eq!(
            eeprom.fill(0x00, &mut NoopDelay::new()),
            Err(EepromError::I2c(ErrorKind::Other))
        );
        eeprom.release().done();
    }

    #[test]
    fn read_all_reads_in_batches() {
        let config = EepromConfig {
            capacity: 300,
            page_size: 32,
        };
        let mut eeprom = Eeprom::with_config(
            I2cMock::new(&[
                I2cTransaction::write_read(ADDR, vec![0x00, 0x00], vec![0xAA; 255]),
                I2cTransaction::write_read(ADDR, vec![0x00, 0xFF], vec![0xBB; 45]),
            ]),
            ADDR,
            config,
        );

        let mut buf = [0u8; 300];
        eeprom.read_all(&mut buf, &mut NoopDelay::new()).unwrap();
        assert!(buf[..255].iter().all(|&b| b == 0xAA));
        assert!(buf[255..].iter().all(|&b| b == 0xBB));
        eeprom.release().done();
    }

    #[test]
    fn read_all_rejects_oversized_buffer() {
        let mut eeprom = small(&[]);
        let mut buf = [0u8; 41];
        assert_eq!(
            eeprom.read_all(&mut buf, &mut NoopDelay::new()),
            Err(EepromError::AddressOutOfRange)
        );
        eeprom.release().done();
    }
}
