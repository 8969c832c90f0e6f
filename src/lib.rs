//! Reads a DHT12 temperature/humidity sensor over a [bit banged] I2C bus,
//! using [`embedded-hal`] pins and delays.
//!
//! [bit banged]: https://en.wikipedia.org/wiki/Bit_banging
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
//!
//! ## Usage
//!
//! ```no_run
//! use dht12_bitbang::dht12::Dht12;
//! use dht12_bitbang::i2c::I2cBB;
//! use dht12_bitbang::line::OpenDrain;
//! use dht12_bitbang::timing::TimingProfile;
//! # use embedded_hal::blocking::delay::DelayUs;
//! # use embedded_hal::digital::v2::{InputPin, OutputPin};
//! # fn demo<P, D, E>(scl: P, sda: P, delay: D) -> Result<(), dht12_bitbang::Error<E>>
//! # where
//! #     P: OutputPin<Error = E> + InputPin<Error = E>,
//! #     D: DelayUs<u32>,
//! # {
//!
//! let scl = OpenDrain::new(scl).map_err(dht12_bitbang::Error::Bus)?;
//! let sda = OpenDrain::new(sda).map_err(dht12_bitbang::Error::Bus)?;
//! let i2c = I2cBB::new(scl, sda, delay, TimingProfile::default())?;
//! let mut sensor = Dht12::new(i2c);
//!
//! let reading = sensor.perform_read()?;
//! let _ = (reading.humidity(), reading.temperature());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod dht12;
mod error;
pub mod i2c;
pub mod line;
pub mod reading;
pub mod timing;

pub use error::Error;
