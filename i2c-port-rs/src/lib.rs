//! Transport port shared by the peripheral drivers in this workspace.
//!
//! Every device driver talks to its chip through the same primitive: write a
//! command frame, optionally followed by a read of a fixed number of bytes,
//! as one uninterrupted exchange against a 7-bit device address.
//!
//! - [`Transport`] is that primitive. It is implemented for every blocking
//!   [`embedded_hal::i2c::I2c`] bus, so any HAL's I2C peripheral (or a
//!   shared-bus wrapper around one) can be handed straight to a driver.
//! - [`I2cDevice`] binds a transport to one device address and offers the
//!   small set of helpers the drivers need.
//!
//! With the `defmt` feature every exchange is traced at `trace` level.
//!
//! Bus errors are passed through untouched. Retry, timeout and arbitration
//! policy belong to the bus implementation, not to this crate.

#![cfg_attr(not(test), no_std)]

use embedded_hal::i2c::I2c;

/// A byte-oriented two-wire bus able to run one command exchange at a time.
pub trait Transport {
    /// Error reported by the underlying bus.
    type Error;

    /// Write `write` to `address`, then read exactly `read.len()` bytes back.
    ///
    /// When `read` is empty only the write phase is issued. When both phases
    /// are present they form a single exchange (repeated start): no other
    /// transaction may be interleaved between them.
    fn transact(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;
}

impl<I> Transport for I
where
    I: I2c,
{
    type Error = I::Error;

    fn transact(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        if read.is_empty() {
            self.write(address, write)
        } else {
            self.write_read(address, write, read)
        }
    }
}

/// A transport bound to a single device address.
///
/// Owns the bus handle for exclusive access. Drivers sharing one physical
/// bus should each be given a shared-bus device wrapper.
#[derive(Debug)]
pub struct I2cDevice<T> {
    bus: T,
    address: u8,
}

impl<T> I2cDevice<T>
where
    T: Transport,
{
    /// Bind `bus` to the 7-bit device `address`.
    pub fn new(bus: T, address: u8) -> Self {
        Self { bus, address }
    }

    /// The 7-bit device address this handle talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Write-only exchange.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c {=u8:#x} write {=[u8]:#x}", self.address, bytes);
        self.bus.transact(self.address, bytes, &mut [])
    }

    /// Write `bytes`, then fill `buffer` from the device.
    pub fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c {=u8:#x} write {=[u8]:#x}, read {=usize}", self.address, bytes, buffer.len());
        self.bus.transact(self.address, bytes, buffer)
    }

    /// Write `bytes`, then read back a single byte.
    pub fn read_byte(&mut self, bytes: &[u8]) -> Result<u8, T::Error> {
        let mut buf = [0u8; 1];
        self.write_read(bytes, &mut buf)?;
        Ok(buf[0])
    }

    /// Give the bus back, consuming the handle.
    pub fn release(self) -> T {
        self.bus
    }
}
