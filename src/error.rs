use core::fmt;

/// Bus and device error
#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// GPIO error
    Bus(E),
    /// Clock or data was already low before the transaction started
    BusBusy,
    /// No ack received after an address or register byte
    AckTimeout,
    /// Invalid input
    InvalidData,
    /// Payload bytes do not sum to the checksum byte
    ChecksumMismatch,
    /// The device cannot be written to
    UnsupportedOperation,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(err) => write!(f, "GPIO error: {:?}", err),
            Error::BusBusy => f.write_str("bus busy"),
            Error::AckTimeout => f.write_str("no acknowledge from device"),
            Error::InvalidData => f.write_str("invalid input"),
            Error::ChecksumMismatch => f.write_str("checksum mismatch"),
            Error::UnsupportedOperation => f.write_str("operation not supported"),
        }
    }
}
