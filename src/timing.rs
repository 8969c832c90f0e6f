//! Bus timing configuration.
//!
//! Every transition on the bus is paced by a quarter or a half of one full
//! clock period. A write bit is `quarter + quarter + half`, a read bit is
//! `half + quarter + quarter`, so both add up to exactly one period.

use core::fmt;

/// Default full clock period, 25 kHz.
pub const DEFAULT_PERIOD_US: u32 = 40;

/// Fastest clock the DHT12 accepts.
pub const MAX_BUS_FREQUENCY_HZ: u32 = 400_000;

/// Rejected clock period
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimingError {
    /// Period is zero or faster than [`MAX_BUS_FREQUENCY_HZ`]
    TooFast,
    /// Period is not a whole number of 4 µs steps
    NotQuarterAligned,
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::TooFast => write!(
                f,
                "clock period exceeds the {} Hz bus limit",
                MAX_BUS_FREQUENCY_HZ
            ),
            TimingError::NotQuarterAligned => {
                f.write_str("clock period must be a multiple of 4 microseconds")
            }
        }
    }
}

/// Full, half and quarter clock cycle durations in microseconds
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimingProfile {
    full_us: u32,
    half_us: u32,
    quarter_us: u32,
}

impl TimingProfile {
    /// Derive the profile from one full clock period.
    pub fn from_period_us(period_us: u32) -> Result<Self, TimingError> {
        if period_us == 0 || 1_000_000 / period_us > MAX_BUS_FREQUENCY_HZ {
            return Err(TimingError::TooFast);
        }
        if period_us % 4 != 0 {
            return Err(TimingError::NotQuarterAligned);
        }

        Ok(TimingProfile {
            full_us: period_us,
            half_us: period_us / 2,
            quarter_us: period_us / 4,
        })
    }

    #[inline]
    pub fn full_us(&self) -> u32 {
        self.full_us
    }

    #[inline]
    pub fn half_us(&self) -> u32 {
        self.half_us
    }

    #[inline]
    pub fn quarter_us(&self) -> u32 {
        self.quarter_us
    }

    /// Effective clock rate
    pub fn frequency_hz(&self) -> u32 {
        1_000_000 / self.full_us
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        TimingProfile {
            full_us: DEFAULT_PERIOD_US,
            half_us: DEFAULT_PERIOD_US / 2,
            quarter_us: DEFAULT_PERIOD_US / 4,
        }
    }
}
