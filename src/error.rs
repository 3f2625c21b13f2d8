//! Unified error types for the sensenode firmware.
//!
//! One small `Copy` enum per collaborator, returned through the port traits.
//! None of these carry heap data, so they can be logged and stored without
//! allocation.
//!
//! The reporting engine never retries.  Supply and radio failures are only
//! logged.  Self-test probe failures and configuration errors are lifted into
//! the umbrella [`Error`]: the self-test context keeps one per failed probe
//! and `main` propagates a rejected configuration.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Failures that outlive the call that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature/humidity sensor failed.
    Sensor(SensorError),
    /// The external flash did not respond as expected.
    Storage(StorageError),
    /// The cryptographic identity chip returned a non-success status.
    Identity(IdentityStatus),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Identity(e) => write!(f, "identity: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction was not acknowledged or failed on the bus.
    Bus,
    /// The device answered but its electronic id is not a supported part.
    UnknownDevice(u8),
    /// A measurement frame failed its CRC-8 check.
    Crc,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::UnknownDevice(id) => write!(f, "unknown device id 0x{id:02X}"),
            Self::Crc => write!(f, "measurement CRC mismatch"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Supply monitor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyError {
    /// The ADC never signalled conversion-complete within the poll budget.
    ConversionTimeout,
    /// A bandgap conversion returned zero, which has no voltage meaning.
    ZeroReading,
}

impl fmt::Display for SupplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversionTimeout => write!(f, "ADC conversion timed out"),
            Self::ZeroReading => write!(f, "ADC returned zero"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// SPI transaction failed.
    Bus,
    /// JEDEC id read back does not match the fitted part.
    UnexpectedJedecId(u16),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI bus error"),
            Self::UnexpectedJedecId(id) => write!(f, "unexpected JEDEC id 0x{id:04X}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Identity chip status
// ---------------------------------------------------------------------------

/// Raw status code reported by the identity chip or its driver.
///
/// Values follow the ATSHA204 library convention so that self-test logs can
/// be compared with vendor documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityStatus(pub u8);

impl IdentityStatus {
    pub const SUCCESS: Self = Self(0x00);
    pub const PARSE_ERROR: Self = Self(0xD2);
    pub const CMD_FAIL: Self = Self(0xD3);
    pub const STATUS_CRC: Self = Self(0xD4);
    pub const INVALID_SIZE: Self = Self(0xE4);
    pub const BAD_CRC: Self = Self(0xE5);
    pub const RX_FAIL: Self = Self(0xE6);
    pub const RX_NO_RESPONSE: Self = Self(0xE7);
    pub const COMM_FAIL: Self = Self(0xF0);

    /// The raw status byte.
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for IdentityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status 0x{:02X}", self.0)
    }
}

impl From<IdentityStatus> for Error {
    fn from(e: IdentityStatus) -> Self {
        Self::Identity(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The message did not fit the frame buffer.
    Encode,
    /// The transport refused or failed to send the frame.
    Transport,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "frame encoding failed"),
            Self::Transport => write!(f, "transport send failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  The message names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
