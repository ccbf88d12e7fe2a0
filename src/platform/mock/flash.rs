//! Mock flash implementation for testing
//!
//! Simulates a word-programmable flash region in memory. Supports:
//! - Real NOR semantics (erase sets bits, programming only clears bits)
//! - Erase count tracking per page for wear leveling validation
//! - Injectable erase/program failures for error-path testing
//! - Corruption injection for recovery testing
//! - Lock-state tracking so tests can assert the program/erase controller
//!   is never left unlocked

use heapless::Vec;

use crate::platform::error::FlashError;
use crate::platform::traits::FlashDevice;

/// Value of an erased flash word
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Mock region capacity in words (16 KB)
const MAX_WORDS: usize = 4096;

/// Mock region capacity in pages
const MAX_PAGES: usize = 16;

/// Mock flash device
///
/// Models a contiguous run of pages starting at a configurable base address.
/// Fresh instances read back fully erased.
#[derive(Debug)]
pub struct MockFlash {
    base: u32,
    page_size: u32,
    storage: Vec<u32, MAX_WORDS>,
    erase_counts: Vec<u32, MAX_PAGES>,
    locked: bool,
    unlocks: u32,
    /// One-shot program failure: fail after this many more successful programs
    fail_program_after: Option<u32>,
    /// One-shot erase failure
    fail_next_erase: bool,
}

impl MockFlash {
    /// Create a mock flash of `page_count` pages of `page_size` bytes,
    /// mapped at `base`
    pub fn new(base: u32, page_size: u32, page_count: u32) -> Self {
        let words = (page_size * page_count / 4) as usize;
        assert!(words <= MAX_WORDS, "mock flash region exceeds capacity");
        assert!(page_count as usize <= MAX_PAGES);

        let mut storage = Vec::new();
        storage.resize(words, ERASED_WORD).ok();
        let mut erase_counts = Vec::new();
        erase_counts.resize(page_count as usize, 0).ok();

        Self {
            base,
            page_size,
            storage,
            erase_counts,
            locked: true,
            unlocks: 0,
            fail_program_after: None,
            fail_next_erase: false,
        }
    }

    fn word_index(&self, address: u32) -> Result<usize, FlashError> {
        if !address.is_multiple_of(4) {
            return Err(FlashError::InvalidAddress);
        }
        let end = self.base + (self.storage.len() as u32) * 4;
        if address < self.base || address >= end {
            return Err(FlashError::InvalidAddress);
        }
        Ok(((address - self.base) / 4) as usize)
    }

    /// Get the raw word at `address` (for test verification)
    pub fn word_at(&self, address: u32) -> u32 {
        let index = self.word_index(address).expect("address out of range");
        self.storage[index]
    }

    /// Flip the low bit of the word at `address` to simulate corruption
    pub fn inject_corruption(&mut self, address: u32) {
        let index = self.word_index(address).expect("address out of range");
        self.storage[index] ^= 0x0000_0001;
    }

    /// Fail the program call issued after `remaining` more successful ones
    ///
    /// One-shot: once the failure fires, subsequent programs succeed again.
    /// Aborting a slot write mid-sequence this way leaves the same on-flash
    /// state as a power loss before the CRC trailer.
    pub fn fail_program_after(&mut self, remaining: u32) {
        self.fail_program_after = Some(remaining);
    }

    /// Fail the next erase call (one-shot)
    pub fn fail_next_erase(&mut self) {
        self.fail_next_erase = true;
    }

    /// Get erase count for the page containing `address`
    pub fn erase_count(&self, address: u32) -> u32 {
        let page = ((address - self.base) / self.page_size) as usize;
        self.erase_counts[page]
    }

    /// Check whether the program/erase controller is locked
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of unlock calls seen (for lock-balance assertions)
    pub fn unlock_count(&self) -> u32 {
        self.unlocks
    }
}

impl FlashDevice for MockFlash {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn erase_page(&mut self, address: u32) -> Result<(), FlashError> {
        if !address.is_multiple_of(self.page_size) {
            return Err(FlashError::InvalidAddress);
        }
        let start = self.word_index(address)?;

        if self.fail_next_erase {
            self.fail_next_erase = false;
            return Err(FlashError::EraseFailed);
        }

        let words_per_page = (self.page_size / 4) as usize;
        for word in &mut self.storage[start..start + words_per_page] {
            *word = ERASED_WORD;
        }

        let page = ((address - self.base) / self.page_size) as usize;
        self.erase_counts[page] += 1;

        Ok(())
    }

    fn program_word(&mut self, address: u32, value: u32) -> Result<(), FlashError> {
        let index = self.word_index(address)?;

        if let Some(remaining) = self.fail_program_after {
            if remaining == 0 {
                self.fail_program_after = None;
                return Err(FlashError::ProgramFailed);
            }
            self.fail_program_after = Some(remaining - 1);
        }

        // NOR flash: programming can only clear bits; the controller reports
        // a fault when the target still holds conflicting data
        if self.storage[index] & value != value {
            return Err(FlashError::ProgramFailed);
        }
        self.storage[index] &= value;

        Ok(())
    }

    fn read_word(&self, address: u32) -> Result<u32, FlashError> {
        let index = self.word_index(address)?;
        Ok(self.storage[index])
    }

    fn unlock(&mut self) {
        self.locked = false;
        self.unlocks += 1;
    }

    fn lock(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u32 = 0x0808_0000;

    fn flash() -> MockFlash {
        MockFlash::new(BASE, 1024, 2)
    }

    #[test]
    fn test_fresh_flash_reads_erased() {
        let flash = flash();
        assert_eq!(flash.read_word(BASE).unwrap(), ERASED_WORD);
        assert_eq!(flash.read_word(BASE + 2044).unwrap(), ERASED_WORD);
    }

    #[test]
    fn test_program_and_read() {
        let mut flash = flash();
        flash.program_word(BASE + 8, 0xBE00_0001).unwrap();
        assert_eq!(flash.read_word(BASE + 8).unwrap(), 0xBE00_0001);
    }

    #[test]
    fn test_program_rejects_set_bits() {
        let mut flash = flash();
        flash.program_word(BASE, 0x0000_00F0).unwrap();
        // A second program may only clear more bits
        flash.program_word(BASE, 0x0000_0030).unwrap();
        assert_eq!(flash.read_word(BASE).unwrap(), 0x0000_0030);
        assert_eq!(
            flash.program_word(BASE, 0x0000_000F),
            Err(FlashError::ProgramFailed)
        );
    }

    #[test]
    fn test_erase_restores_word() {
        let mut flash = flash();
        flash.program_word(BASE + 4, 0x1234_5678).unwrap();
        flash.erase_page(BASE).unwrap();
        assert_eq!(flash.read_word(BASE + 4).unwrap(), ERASED_WORD);
    }

    #[test]
    fn test_erase_counts() {
        let mut flash = flash();
        flash.erase_page(BASE).unwrap();
        flash.erase_page(BASE).unwrap();
        flash.erase_page(BASE + 1024).unwrap();
        assert_eq!(flash.erase_count(BASE), 2);
        assert_eq!(flash.erase_count(BASE + 1024), 1);
    }

    #[test]
    fn test_unaligned_erase_rejected() {
        let mut flash = flash();
        assert_eq!(
            flash.erase_page(BASE + 512),
            Err(FlashError::InvalidAddress)
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut flash = flash();
        assert_eq!(flash.read_word(BASE + 2048), Err(FlashError::InvalidAddress));
        assert_eq!(flash.read_word(BASE - 4), Err(FlashError::InvalidAddress));
        assert_eq!(
            flash.program_word(BASE + 1, 0),
            Err(FlashError::InvalidAddress)
        );
    }

    #[test]
    fn test_program_failure_injection() {
        let mut flash = flash();
        flash.fail_program_after(2);
        flash.program_word(BASE, 1).unwrap();
        flash.program_word(BASE + 4, 2).unwrap();
        assert_eq!(
            flash.program_word(BASE + 8, 3),
            Err(FlashError::ProgramFailed)
        );
        // One-shot: next program succeeds
        flash.program_word(BASE + 8, 3).unwrap();
    }

    #[test]
    fn test_erase_failure_injection() {
        let mut flash = flash();
        flash.fail_next_erase();
        assert_eq!(flash.erase_page(BASE), Err(FlashError::EraseFailed));
        flash.erase_page(BASE).unwrap();
    }

    #[test]
    fn test_lock_tracking() {
        let mut flash = flash();
        assert!(flash.is_locked());
        flash.unlock();
        assert!(!flash.is_locked());
        assert_eq!(flash.unlock_count(), 1);
        flash.lock();
        assert!(flash.is_locked());
    }

    #[test]
    fn test_corruption_injection() {
        let mut flash = flash();
        flash.program_word(BASE, 0xBE00_0010).unwrap();
        flash.inject_corruption(BASE);
        assert_eq!(flash.read_word(BASE).unwrap(), 0xBE00_0011);
    }
}
