//! Flash device capability
//!
//! This module defines the flash interface the settings store programs and
//! scans through. Implementations wrap the MCU's internal flash controller.
//!
//! # Flash Characteristics
//!
//! - Flash is organized in pages (the minimum erasable unit)
//! - Erase sets every bit of a page to 1 (words read back `0xFFFF_FFFF`)
//! - Programming can only change bits from 1 to 0; a location must be erased
//!   before it can hold a new value
//! - Erase and program busy-wait internally until the hardware operation
//!   completes or reports a fault; there is no cooperative suspension
//!
//! # Locking
//!
//! The program/erase controller is a shared, globally stateful resource. A
//! single [`erase_page`]/[`program_word`] call must write-enable the
//! controller itself if invoked while locked; callers performing a multi-word
//! sequence keep it enabled across the whole sequence with [`unlock`] and
//! guarantee a matching [`lock`] on every exit path.
//!
//! [`erase_page`]: FlashDevice::erase_page
//! [`program_word`]: FlashDevice::program_word
//! [`unlock`]: FlashDevice::unlock
//! [`lock`]: FlashDevice::lock

use crate::platform::error::FlashError;

/// Flash device interface
///
/// Word-granular access to MCU internal flash. All addresses are absolute
/// flash addresses; implementations must validate them against the device's
/// writable bounds.
pub trait FlashDevice {
    /// Get the page size in bytes (minimum erase unit)
    fn page_size(&self) -> u32;

    /// Erase the page starting at `address`
    ///
    /// `address` must be page-aligned. After a successful erase every word
    /// of the page reads back `0xFFFF_FFFF`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidAddress`] if the address is misaligned or
    /// out of bounds, [`FlashError::EraseFailed`] if the hardware reports a
    /// fault.
    fn erase_page(&mut self, address: u32) -> Result<(), FlashError>;

    /// Program one 32-bit word at a word-aligned address
    ///
    /// The target location must have been erased since it last held data.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidAddress`] if the address is misaligned or
    /// out of bounds, [`FlashError::ProgramFailed`] if the hardware reports a
    /// fault.
    fn program_word(&mut self, address: u32, value: u32) -> Result<(), FlashError>;

    /// Read one 32-bit word at a word-aligned address
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidAddress`] if the address is misaligned or
    /// out of bounds, [`FlashError::ReadFailed`] if the read fails.
    fn read_word(&self, address: u32) -> Result<u32, FlashError>;

    /// Write-enable the program/erase controller
    fn unlock(&mut self);

    /// Re-lock the program/erase controller
    fn lock(&mut self);
}
