//! Every error that can occur in Devseek.

/// Alias to simplify implementing the results of Devseek functions.
pub type DeviceResult<T> = Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// Error for when the OS refuses to open a device enumeration; the
    /// inventory cannot be searched at all. Per-device property failures are
    /// never an [Error]: they only thin out the resulting report.
    EnumerationUnavailable,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Error::*;

        match self {
            EnumerationUnavailable => write!(f, "device enumeration unavailable")?,
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
