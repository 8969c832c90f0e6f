//! Sensor payload and its checksum.

/// Size of a reading on the wire and in serialized buffers.
pub const READING_LEN: usize = 5;

/// `true` if `checksum` is the 8-bit wrapping sum of the payload.
pub fn checksum_matches(payload: [u8; 4], checksum: u8) -> bool {
    payload.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte)) == checksum
}

/// One byte of a [`Reading`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    HumidityInt,
    HumidityFrac,
    TempInt,
    TempFrac,
    Checksum,
}

impl Field {
    /// All fields in wire order
    pub const ALL: [Field; READING_LEN] = [
        Field::HumidityInt,
        Field::HumidityFrac,
        Field::TempInt,
        Field::TempFrac,
        Field::Checksum,
    ];
}

/// Data read from the DHT12.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reading {
    pub humidity_int: u8,
    pub humidity_frac: u8,
    pub temp_int: u8,
    pub temp_frac: u8,
    pub checksum: u8,
}

impl Reading {
    /// Build a reading from raw bytes in wire order.
    ///
    /// Returns `None` if the checksum does not match.
    pub fn from_bytes(bytes: [u8; READING_LEN]) -> Option<Reading> {
        let payload = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if !checksum_matches(payload, bytes[4]) {
            return None;
        }

        Some(Reading {
            humidity_int: bytes[0],
            humidity_frac: bytes[1],
            temp_int: bytes[2],
            temp_frac: bytes[3],
            checksum: bytes[4],
        })
    }

    /// Serialize in wire order.
    pub fn to_bytes(&self) -> [u8; READING_LEN] {
        [
            self.humidity_int,
            self.humidity_frac,
            self.temp_int,
            self.temp_frac,
            self.checksum,
        ]
    }

    /// `true` if the checksum byte matches the payload.
    ///
    /// Always holds for readings returned by the driver; only a hand-built
    /// `Reading` can fail it.
    pub fn is_valid(&self) -> bool {
        checksum_matches(
            [
                self.humidity_int,
                self.humidity_frac,
                self.temp_int,
                self.temp_frac,
            ],
            self.checksum,
        )
    }

    pub fn field(&self, field: Field) -> u8 {
        match field {
            Field::HumidityInt => self.humidity_int,
            Field::HumidityFrac => self.humidity_frac,
            Field::TempInt => self.temp_int,
            Field::TempFrac => self.temp_frac,
            Field::Checksum => self.checksum,
        }
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.humidity_int as f32 + self.humidity_frac as f32 * 0.1
    }

    /// Temperature in degrees Celsius.
    ///
    /// Bit 7 of the fractional byte is the sign.
    pub fn temperature(&self) -> f32 {
        let magnitude = self.temp_int as f32 + (self.temp_frac & 0x7F) as f32 * 0.1;
        if self.temp_frac & 0x80 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl From<Reading> for [u8; READING_LEN] {
    fn from(reading: Reading) -> Self {
        reading.to_bytes()
    }
}

/// Last good reading, stamped with whatever clock the owner uses.
///
/// The driver never fills this in; it is for layers that publish the most
/// recent values between reads.
#[derive(Debug)]
pub struct ReadingCache<T> {
    latest: Option<(T, Reading)>,
}

impl<T: Copy> ReadingCache<T> {
    pub const fn new() -> Self {
        ReadingCache { latest: None }
    }

    pub fn record(&mut self, taken_at: T, reading: Reading) {
        self.latest = Some((taken_at, reading));
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref().map(|(_, reading)| reading)
    }

    pub fn taken_at(&self) -> Option<T> {
        self.latest.as_ref().map(|(taken_at, _)| *taken_at)
    }

    pub fn field(&self, field: Field) -> Option<u8> {
        self.latest().map(|reading| reading.field(field))
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

impl<T: Copy> Default for ReadingCache<T> {
    fn default() -> Self {
        ReadingCache::new()
    }
}
