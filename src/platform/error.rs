//! Store error types
//!
//! All faults are surfaced to the caller as explicit results. Flash-level
//! failures are treated as hardware-fatal at this layer: there is no internal
//! retry and no process-wide error state.

use core::fmt;

/// Result type for settings store operations
pub type Result<T> = core::result::Result<T, StoreError>;

/// Errors surfaced by settings store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Invalid store configuration, rejected before any flash access
    Config(ConfigError),
    /// No valid settings slot located in the region
    NotFound,
    /// A flash erase/program/read call failed
    Flash(FlashError),
}

/// Configuration errors detected at store construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Record size is not a multiple of 4 bytes (word alignment)
    RecordSizeUnaligned,
    /// Region start address is not page-aligned
    RegionUnaligned,
    /// Region is too small to hold a single slot
    RegionTooSmall,
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// Page erase operation failed
    EraseFailed,
    /// Word program operation failed
    ProgramFailed,
    /// Read operation failed
    ReadFailed,
    /// Address out of bounds or misaligned
    InvalidAddress,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Config(e) => write!(f, "configuration error: {:?}", e),
            StoreError::NotFound => write!(f, "no valid settings found"),
            StoreError::Flash(e) => write!(f, "flash error: {:?}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RecordSizeUnaligned => {
                write!(f, "record size must be a multiple of 4 bytes")
            }
            ConfigError::RegionUnaligned => write!(f, "region start must be page-aligned"),
            ConfigError::RegionTooSmall => write!(f, "region cannot hold a single slot"),
        }
    }
}

// From implementations for error conversion
impl From<FlashError> for StoreError {
    fn from(error: FlashError) -> Self {
        StoreError::Flash(error)
    }
}

impl From<ConfigError> for StoreError {
    fn from(error: ConfigError) -> Self {
        StoreError::Config(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_error_conversion() {
        let err: StoreError = FlashError::EraseFailed.into();
        assert_eq!(err, StoreError::Flash(FlashError::EraseFailed));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: StoreError = ConfigError::RecordSizeUnaligned.into();
        assert_eq!(err, StoreError::Config(ConfigError::RecordSizeUnaligned));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", StoreError::NotFound),
            "no valid settings found"
        );
        assert!(format!("{}", StoreError::Flash(FlashError::ProgramFailed)).contains("flash"));
    }
}
