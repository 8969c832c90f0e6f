//! DHT12 temperature and humidity sensor.
//!
//! One call to [`Dht12::perform_read`] is one complete bus transaction:
//! point the sensor at its payload register, restart in read mode, pull in
//! the four payload bytes and the checksum, then stop.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::i2c::WriteRead;

use crate::error::Error;
use crate::i2c::I2cBB;
use crate::line::Line;
use crate::reading::{Reading, READING_LEN};

/// 7-bit bus address (0xB8 once shifted with the direction bit)
pub const ADDRESS: u8 = 0x5C;

/// Register holding the first payload byte
pub const PAYLOAD_REGISTER: u8 = 0x00;

/// DHT12 on a bit-banged bus
pub struct Dht12<SCL, SDA, D> {
    i2c: I2cBB<SCL, SDA, D>,
}

impl<SCL, SDA, D, E> Dht12<SCL, SDA, D>
where
    SCL: Line<Error = E>,
    SDA: Line<Error = E>,
    D: DelayUs<u32>,
{
    pub fn new(i2c: I2cBB<SCL, SDA, D>) -> Self {
        Dht12 { i2c }
    }

    /// Give back the bus
    pub fn destroy(self) -> I2cBB<SCL, SDA, D> {
        self.i2c
    }

    /// Read and validate one sample.
    ///
    /// Fails with [`Error::BusBusy`] without touching the lines if either one
    /// is low beforehand, [`Error::AckTimeout`] if the sensor does not answer,
    /// and [`Error::ChecksumMismatch`] if the payload is corrupt. There is no
    /// retry; the lines are released in every case.
    pub fn perform_read(&mut self) -> Result<Reading, Error<E>> {
        let mut raw = [0u8; READING_LEN];
        self.i2c.write_read(ADDRESS, &[PAYLOAD_REGISTER], &mut raw)?;

        log::debug!(
            "humInt:{} humFlt:{} tmpInt:{} tmpFlt:{} chkSum:{}",
            raw[0],
            raw[1],
            raw[2],
            raw[3],
            raw[4]
        );

        match Reading::from_bytes(raw) {
            Some(reading) => Ok(reading),
            None => {
                log::warn!("checksum mismatch, discarding {:?}", raw);
                Err(Error::ChecksumMismatch)
            }
        }
    }

    /// Read one sample into `buf` in wire order and return its length.
    ///
    /// `buf` must hold at least [`READING_LEN`] bytes; anything past that is
    /// left untouched.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, Error<E>> {
        if buf.len() < READING_LEN {
            return Err(Error::InvalidData);
        }

        let reading = self.perform_read()?;
        buf[..READING_LEN].copy_from_slice(&reading.to_bytes());
        Ok(READING_LEN)
    }

    /// The sensor takes no commands through this driver.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, Error<E>> {
        log::debug!("rejected write of {} bytes", data.len());
        Err(Error::UnsupportedOperation)
    }
}
