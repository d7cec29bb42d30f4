use std::error;
use std::fmt;

/// Errors returned by the driver. `E` is the error type of the bus interface.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// A register read or write failed on the bus.
    Transport(E),
    /// The chip ID register did not hold 0x60; carries the value found.
    IdentityMismatch(u8),
    /// The status register kept reporting busy past the poll limit.
    Timeout,
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Transport(ref e) => write!(f, "bus transfer failed: {}", e),
            Error::IdentityMismatch(id) => {
                write!(f, "unexpected chip id {:#04x}, expected 0x60", id)
            }
            Error::Timeout => write!(f, "measurement did not complete in time"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> error::Error for Error<E> {}

/// A register code that does not name a valid setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSetting {
    pub setting: &'static str,
    pub value: u8,
}

impl fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected {} value {}", self.setting, self.value)
    }
}

impl error::Error for InvalidSetting {}
