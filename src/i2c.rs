/*!
  # Synchronous I2C master over two bit-banged lines

  This implementation consumes the following hardware resources:
  - A blocking microsecond delay to pace every transition
  - Two lines for SDA and SCL, each switchable between input and output

  Note that the current implementation does not support clock stretching
  or multi-master arbitration.

  ## Hardware requirements

  1. Both lines need external pull-up resistors.
  2. The delay must busy-wait. A delay that can yield to a scheduler breaks
     the quarter cycle windows.

  ## Framing

  Between transactions both lines are released (input). A transaction starts
  only if both read high, and always ends with both released again, whether
  it succeeded or was aborted after a missing acknowledge.

  ```no_run
    use dht12_bitbang::i2c::I2cBB;
    use dht12_bitbang::timing::TimingProfile;
    use embedded_hal::blocking::i2c::WriteRead;

    # fn demo<SCL, SDA, D, E>(scl: SCL, sda: SDA, delay: D) -> Result<(), dht12_bitbang::Error<E>>
    # where
    #     SCL: dht12_bitbang::line::Line<Error = E>,
    #     SDA: dht12_bitbang::line::Line<Error = E>,
    #     D: embedded_hal::blocking::delay::DelayUs<u32>,
    # {
    let mut i2c = I2cBB::new(scl, sda, delay, TimingProfile::default())?;
    let mut payload = [0u8; 5];
    i2c.write_read(0x5C, &[0x00], &mut payload)?;
    # Ok(())
    # }
  ```
*/

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use embedded_hal::digital::v2::PinState;

use crate::error::Error;
use crate::line::{Direction, Line};
use crate::timing::TimingProfile;

const WRITE_BIT: u8 = 0x0;
const READ_BIT: u8 = 0x1;

/// Level of bit `n` of `byte`.
#[inline]
pub(crate) fn bit(byte: u8, n: u8) -> PinState {
    PinState::from((byte >> n) & 0b1 == 1)
}

/// `byte` with bit `n` set or cleared to match `level`.
#[inline]
pub(crate) fn with_bit(byte: u8, n: u8, level: PinState) -> u8 {
    match level {
        PinState::High => byte | (1 << n),
        PinState::Low => byte & !(1 << n),
    }
}

/// Bit banging I2C master
pub struct I2cBB<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    timing: TimingProfile,
}

impl<SCL, SDA, D, E> I2cBB<SCL, SDA, D>
where
    SCL: Line<Error = E>,
    SDA: Line<Error = E>,
    D: DelayUs<u32>,
{
    /// Take the lines and release both of them.
    pub fn new(scl: SCL, sda: SDA, delay: D, timing: TimingProfile) -> Result<Self, Error<E>> {
        let mut i2c = I2cBB {
            scl,
            sda,
            delay,
            timing,
        };
        i2c.release_lines()?;
        Ok(i2c)
    }

    /// Give back the lines and the delay
    pub fn destroy(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    /// Clock timing this bus was built with
    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    // Reads the lines as they are: every exit path leaves both released.
    fn i2c_is_idle(&mut self) -> Result<bool, Error<E>> {
        let scl = self.scl.get_level().map_err(Error::Bus)?;
        let sda = self.sda.get_level().map_err(Error::Bus)?;
        Ok(scl == PinState::High && sda == PinState::High)
    }

    /// Idle check followed by a start condition.
    fn i2c_begin(&mut self) -> Result<(), Error<E>> {
        if !self.i2c_is_idle()? {
            log::debug!("bus busy, transaction not started");
            return Err(Error::BusBusy);
        }
        self.i2c_start()
    }

    fn i2c_start(&mut self) -> Result<(), Error<E>> {
        // SDA falls while SCL is high
        self.scl_output(PinState::High)?;
        self.sda_output(PinState::Low)?;
        self.wait_half();

        Ok(())
    }

    fn i2c_restart(&mut self) -> Result<(), Error<E>> {
        self.set_scl(PinState::Low)?;
        self.wait_half();

        self.sda_output(PinState::High)?;
        self.set_scl(PinState::High)?;
        self.wait_half();

        self.set_sda(PinState::Low)?;
        self.wait_half();

        Ok(())
    }

    fn i2c_stop(&mut self) -> Result<(), Error<E>> {
        self.set_scl(PinState::Low)?;
        self.sda_output(PinState::Low)?;
        self.wait_half();

        // SDA rises while SCL is high
        self.set_scl(PinState::High)?;
        self.wait_quarter();
        self.set_sda(PinState::High)?;
        self.wait_quarter();

        Ok(())
    }

    fn i2c_write_bit(&mut self, n: u8, byte: u8) -> Result<(), Error<E>> {
        self.set_scl(PinState::Low)?;
        self.wait_quarter();

        self.set_sda(bit(byte, n))?;
        self.wait_quarter();

        self.set_scl(PinState::High)?;
        self.wait_half();

        Ok(())
    }

    fn i2c_write_byte(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.scl_output(PinState::Low)?;
        self.sda_output(PinState::Low)?;

        for n in (0..8).rev() {
            self.i2c_write_bit(n, byte)?;
        }

        Ok(())
    }

    fn i2c_read_bit(&mut self, n: u8, byte: u8) -> Result<u8, Error<E>> {
        self.set_scl(PinState::Low)?;
        self.wait_half();

        self.set_scl(PinState::High)?;
        self.wait_quarter();

        let level = self.sda.get_level().map_err(Error::Bus)?;
        self.wait_quarter();

        Ok(with_bit(byte, n, level))
    }

    fn i2c_read_byte(&mut self) -> Result<u8, Error<E>> {
        self.set_scl(PinState::Low)?;
        self.sda_input()?;

        let mut byte: u8 = 0;
        for n in (0..8).rev() {
            byte = self.i2c_read_bit(n, byte)?;
        }

        Ok(byte)
    }

    fn i2c_is_ack(&mut self) -> Result<bool, Error<E>> {
        self.set_scl(PinState::Low)?;
        self.sda_input()?;
        self.wait_half();

        self.set_scl(PinState::High)?;
        self.wait_half();

        Ok(self.sda.get_level().map_err(Error::Bus)? == PinState::Low)
    }

    fn i2c_send_ack(&mut self) -> Result<(), Error<E>> {
        self.set_scl(PinState::Low)?;
        self.wait_quarter();

        self.sda_output(PinState::Low)?;
        self.wait_quarter();

        self.set_scl(PinState::High)?;
        self.wait_half();

        Ok(())
    }

    fn i2c_send_nack(&mut self) -> Result<(), Error<E>> {
        self.scl_output(PinState::Low)?;
        self.sda_output(PinState::High)?;
        self.wait_half();

        self.set_scl(PinState::High)?;
        self.wait_half();

        Ok(())
    }

    /// Nack, stop and release.
    fn i2c_finish(&mut self) -> Result<(), Error<E>> {
        self.i2c_send_nack()?;
        self.i2c_stop()?;
        self.release_lines()
    }

    #[inline]
    fn check_ack(&mut self) -> Result<(), Error<E>> {
        if !self.i2c_is_ack()? {
            log::warn!("no ack from device, aborting transaction");
            self.i2c_finish()?;
            Err(Error::AckTimeout)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn read_from_slave(&mut self, input: &mut [u8]) -> Result<(), Error<E>> {
        let last = input.len() - 1;
        for (i, byte) in input.iter_mut().enumerate() {
            *byte = self.i2c_read_byte()?;
            if i != last {
                self.i2c_send_ack()?;
            }
        }
        Ok(())
    }

    #[inline]
    fn write_to_slave(&mut self, output: &[u8]) -> Result<(), Error<E>> {
        for byte in output {
            self.i2c_write_byte(*byte)?;
            self.check_ack()?;
        }
        Ok(())
    }

    /// Make sure a failed pin operation does not leave the bus driven.
    fn settle<T>(&mut self, result: Result<T, Error<E>>) -> Result<T, Error<E>> {
        if let Err(Error::Bus(_)) = result {
            self.release_lines().ok();
        }
        result
    }

    fn release_lines(&mut self) -> Result<(), Error<E>> {
        self.scl.set_direction(Direction::Input).map_err(Error::Bus)?;
        self.sda_input()
    }

    #[inline]
    fn scl_output(&mut self, level: PinState) -> Result<(), Error<E>> {
        self.scl
            .set_direction(Direction::Output(level))
            .map_err(Error::Bus)
    }

    #[inline]
    fn sda_output(&mut self, level: PinState) -> Result<(), Error<E>> {
        self.sda
            .set_direction(Direction::Output(level))
            .map_err(Error::Bus)
    }

    #[inline]
    fn sda_input(&mut self) -> Result<(), Error<E>> {
        self.sda.set_direction(Direction::Input).map_err(Error::Bus)
    }

    #[inline]
    fn set_scl(&mut self, level: PinState) -> Result<(), Error<E>> {
        self.scl.set_level(level).map_err(Error::Bus)
    }

    #[inline]
    fn set_sda(&mut self, level: PinState) -> Result<(), Error<E>> {
        self.sda.set_level(level).map_err(Error::Bus)
    }

    #[inline]
    fn wait_quarter(&mut self) {
        self.delay.delay_us(self.timing.quarter_us());
    }

    #[inline]
    fn wait_half(&mut self) {
        self.delay.delay_us(self.timing.half_us());
    }

    fn write_transaction(&mut self, addr: u8, output: &[u8]) -> Result<(), Error<E>> {
        // ST
        self.i2c_begin()?;

        // SAD + W
        self.i2c_write_byte((addr << 1) | WRITE_BIT)?;
        self.check_ack()?;

        self.write_to_slave(output)?;

        // SP
        self.i2c_stop()?;
        self.release_lines()
    }

    fn read_transaction(&mut self, addr: u8, input: &mut [u8]) -> Result<(), Error<E>> {
        // ST
        self.i2c_begin()?;

        // SAD + R
        self.i2c_write_byte((addr << 1) | READ_BIT)?;
        self.check_ack()?;

        self.read_from_slave(input)?;

        // NACK + SP
        self.i2c_finish()
    }

    fn write_read_transaction(
        &mut self,
        addr: u8,
        output: &[u8],
        input: &mut [u8],
    ) -> Result<(), Error<E>> {
        // ST
        self.i2c_begin()?;

        // SAD + W
        self.i2c_write_byte((addr << 1) | WRITE_BIT)?;
        self.check_ack()?;

        self.write_to_slave(output)?;

        // SR
        self.i2c_restart()?;

        // SAD + R
        self.i2c_write_byte((addr << 1) | READ_BIT)?;
        self.check_ack()?;

        self.read_from_slave(input)?;

        // NACK + SP
        self.i2c_finish()
    }
}

impl<SCL, SDA, D, E> Write for I2cBB<SCL, SDA, D>
where
    SCL: Line<Error = E>,
    SDA: Line<Error = E>,
    D: DelayUs<u32>,
{
    type Error = Error<E>;

    fn write(&mut self, addr: u8, output: &[u8]) -> Result<(), Self::Error> {
        if output.is_empty() {
            return Ok(());
        }

        let result = self.write_transaction(addr, output);
        self.settle(result)
    }
}

impl<SCL, SDA, D, E> Read for I2cBB<SCL, SDA, D>
where
    SCL: Line<Error = E>,
    SDA: Line<Error = E>,
    D: DelayUs<u32>,
{
    type Error = Error<E>;

    fn read(&mut self, addr: u8, input: &mut [u8]) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Ok(());
        }

        let result = self.read_transaction(addr, input);
        self.settle(result)
    }
}

impl<SCL, SDA, D, E> WriteRead for I2cBB<SCL, SDA, D>
where
    SCL: Line<Error = E>,
    SDA: Line<Error = E>,
    D: DelayUs<u32>,
{
    type Error = Error<E>;

    fn write_read(&mut self, addr: u8, output: &[u8], input: &mut [u8]) -> Result<(), Self::Error> {
        if output.is_empty() || input.is_empty() {
            return Err(Error::InvalidData);
        }

        let result = self.write_read_transaction(addr, output, input);
        self.settle(result)
    }
}
