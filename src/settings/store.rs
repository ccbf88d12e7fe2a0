//! Wear-leveling settings store
//!
//! Persists one fixed-size record in a dedicated flash region with:
//! - Slot rotation across the whole region (wear leveling: every slot is
//!   written once before any slot is reused)
//! - A 24-bit version counter selecting the current slot on recovery
//! - A CRC trailer programmed last, so a slot only becomes discoverable once
//!   it is complete (crash safety: interrupted writes are never current)
//!
//! # Recovery
//!
//! The store caches a cursor to the last known current slot. When the cursor
//! is unknown (after construction or [`reset`]), the next access scans every
//! slot in the region and adopts the highest version whose CRC trailer
//! matches. The scan is linear in region size and runs at most once per
//! cursor invalidation, typically once at startup.
//!
//! # Endurance
//!
//! With a 12-byte record the slot size is 32 bytes; two 1 KB pages hold 64
//! slots, so each page is erased once per 64 writes. A part guaranteeing 10K
//! erase cycles per page then sustains 640K settings writes. The version
//! counter itself bounds the store's lifetime at 16M writes.
//!
//! [`reset`]: SettingsStore::reset

use bytemuck::Pod;
use core::marker::PhantomData;

use super::slot;
use crate::platform::error::{ConfigError, Result, StoreError};
use crate::platform::traits::{CrcEngine, FlashDevice, RandomSource};

/// Flash region dedicated to settings storage
///
/// Immutable for the store's lifetime. At least two pages are recommended so
/// one page remains valid while another is erased for reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First flash address of the region (must be page-aligned)
    pub first_location: u32,
    /// Number of pages dedicated to settings
    pub page_count: u32,
}

impl Region {
    /// Create a region descriptor
    pub const fn new(first_location: u32, page_count: u32) -> Self {
        Self {
            first_location,
            page_count,
        }
    }
}

/// Last known current slot
#[derive(Debug, Clone, Copy)]
struct Cursor {
    location: u32,
    version: u32,
}

/// Wear statistics for endurance monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Total number of successful settings writes
    pub writes: u32,
    /// Total number of page erases issued
    pub pages_erased: u32,
}

/// Keeps the flash program/erase controller write-enabled for a multi-step
/// sequence and re-locks it on every exit path, including early errors.
struct UnlockGuard<'a, F: FlashDevice> {
    flash: &'a mut F,
}

impl<'a, F: FlashDevice> UnlockGuard<'a, F> {
    fn new(flash: &'a mut F) -> Self {
        flash.unlock();
        Self { flash }
    }
}

impl<F: FlashDevice> core::ops::Deref for UnlockGuard<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.flash
    }
}

impl<F: FlashDevice> core::ops::DerefMut for UnlockGuard<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.flash
    }
}

impl<F: FlashDevice> Drop for UnlockGuard<'_, F> {
    fn drop(&mut self) {
        self.flash.lock();
    }
}

/// Versioned settings store over a flash region
///
/// Generic over the record type `R` (a plain-data struct whose size is a
/// multiple of 4 bytes) and the three injected capabilities: flash device,
/// CRC engine, and random filler source.
///
/// A store instance has a single logical owner; calls are sequential and
/// non-reentrant (`&mut self`).
///
/// # Example
///
/// ```ignore
/// use bytemuck::{Pod, Zeroable};
/// use nvstore::platform::mock::{MockFlash, MockRandom, SoftCrc};
/// use nvstore::settings::{Region, SettingsStore};
///
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// #[repr(C)]
/// struct NetConfig {
///     address: u32,
///     port: u32,
///     flags: u32,
/// }
///
/// let region = Region::new(0x0808_0000, 2);
/// let flash = MockFlash::new(0x0808_0000, 1024, 2);
/// let mut store: SettingsStore<NetConfig, _, _, _> =
///     SettingsStore::new(flash, SoftCrc::new(), MockRandom::new(1), region).unwrap();
///
/// let config = NetConfig { address: 0x0A00_0001, port: 5760, flags: 0 };
/// store.write(&config).unwrap();
/// ```
pub struct SettingsStore<R, F, C, G> {
    flash: F,
    crc: C,
    rng: G,
    region: Region,
    page_size: u32,
    slot_bytes: u32,
    cursor: Option<Cursor>,
    stats: StoreStats,
    _record: PhantomData<R>,
}

impl<R, F, C, G> SettingsStore<R, F, C, G>
where
    R: Pod,
    F: FlashDevice,
    C: CrcEngine,
    G: RandomSource,
{
    /// Create a settings store over `region`
    ///
    /// Validates the configuration before any erase or program happens:
    /// - the record size must be a multiple of 4 bytes
    /// - the region start must be page-aligned
    /// - the region must hold at least one slot
    ///
    /// The cursor starts unknown; the first `read` or `write` scans the
    /// region for the current slot.
    pub fn new(flash: F, crc: C, rng: G, region: Region) -> Result<Self> {
        let record_bytes = core::mem::size_of::<R>();
        if record_bytes % 4 != 0 {
            return Err(ConfigError::RecordSizeUnaligned.into());
        }

        let page_size = flash.page_size();
        if !region.first_location.is_multiple_of(page_size) {
            return Err(ConfigError::RegionUnaligned.into());
        }

        let slot_bytes = slot::slot_bytes(record_bytes);
        if slot_bytes > page_size * region.page_count {
            return Err(ConfigError::RegionTooSmall.into());
        }

        Ok(Self {
            flash,
            crc,
            rng,
            region,
            page_size,
            slot_bytes,
            cursor: None,
            stats: StoreStats::default(),
            _record: PhantomData,
        })
    }

    /// Read the current settings record into `record`
    ///
    /// Scans the region first if the cursor is unknown. Never writes flash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no valid slot exists, or the
    /// flash error if a read fails.
    pub fn read(&mut self, record: &mut R) -> Result<()> {
        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None => self.rescan()?,
        };

        let mut address = cursor.location + 4;
        for chunk in bytemuck::bytes_of_mut(record).chunks_exact_mut(4) {
            let word = self.flash.read_word(address)?;
            chunk.copy_from_slice(&word.to_le_bytes());
            address += 4;
        }

        Ok(())
    }

    /// Write a new settings record
    ///
    /// Programs the record into the next slot of the rotation, erasing the
    /// owning page when the slot begins a new one. The slot's CRC trailer is
    /// programmed last; only then does the slot become discoverable and the
    /// cursor advance. A failure at any step leaves the cursor, and the
    /// previously current slot, untouched.
    ///
    /// # Errors
    ///
    /// Returns the flash error if a page erase or word program fails.
    pub fn write(&mut self, record: &R) -> Result<()> {
        let (last_location, last_version) = match self.cursor {
            Some(cursor) => (cursor.location, cursor.version),
            None => match self.find_latest()? {
                Some(cursor) => {
                    self.cursor = Some(cursor);
                    (cursor.location, cursor.version)
                }
                None => {
                    // Empty region: seed one slot before the end so the
                    // next-slot computation below wraps the first write to
                    // the region start, version 1.
                    crate::log_debug!("settings: empty region, first write seeds version 1");
                    (self.region_end() - self.slot_bytes, 0)
                }
            },
        };

        let new_version = last_version + 1;
        let mut new_location = last_location + self.slot_bytes;
        if new_location >= self.region_end() {
            new_location = self.region.first_location;
        }

        // Entering a new page: erase it before the slot is programmed
        if new_location.is_multiple_of(self.page_size) {
            self.flash.erase_page(new_location)?;
            self.stats.pages_erased += 1;
        }

        let record_words = (core::mem::size_of::<R>() / 4) as u32;
        let slot_words = self.slot_bytes / 4;
        let filler_words = slot_words - record_words - 2;

        // Keep the controller write-enabled for the whole program sequence;
        // the guard re-locks on success and on every error return
        let mut flash = UnlockGuard::new(&mut self.flash);

        self.crc.reset();

        let header = slot::pack_header(new_version);
        flash.program_word(new_location, header)?;
        self.crc.accumulate(header);

        let mut address = new_location + 4;
        for chunk in bytemuck::bytes_of(record).chunks_exact(4) {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            flash.program_word(address, word)?;
            self.crc.accumulate(word);
            address += 4;
        }

        for _ in 0..filler_words {
            let word = self.rng.next_word();
            flash.program_word(address, word)?;
            self.crc.accumulate(word);
            address += 4;
        }

        // The slot only becomes valid once the trailer lands
        flash.program_word(address, self.crc.value())?;
        drop(flash);

        self.cursor = Some(Cursor {
            location: new_location,
            version: new_version,
        });
        self.stats.writes += 1;

        Ok(())
    }

    /// Erase every page of the region
    ///
    /// The cursor is invalidated first: a failed erase may already have
    /// destroyed the slot it pointed at, and pages erased before the failure
    /// stay erased.
    ///
    /// # Errors
    ///
    /// Returns the flash error of the first page erase that fails.
    pub fn erase(&mut self) -> Result<()> {
        self.cursor = None;

        let mut flash = UnlockGuard::new(&mut self.flash);
        let mut address = self.region.first_location;
        for _ in 0..self.region.page_count {
            flash.erase_page(address)?;
            self.stats.pages_erased += 1;
            address += self.page_size;
        }

        crate::log_info!("settings: region erased");
        Ok(())
    }

    /// Forget the cached cursor, forcing the next access to rescan
    ///
    /// No flash access.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Version of the current slot, if one is known
    pub fn current_version(&self) -> Option<u32> {
        self.cursor.map(|cursor| cursor.version)
    }

    /// Slot size in bytes for this store's record type
    pub fn slot_bytes(&self) -> u32 {
        self.slot_bytes
    }

    /// Number of slots in the region
    pub fn entry_count(&self) -> u32 {
        slot::entry_count(self.page_size, self.region.page_count, self.slot_bytes)
    }

    /// The region this store operates on
    pub fn region(&self) -> Region {
        self.region
    }

    /// Wear statistics
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Settings writes sustainable before any page exceeds `page_cycles`
    /// erase/program cycles
    pub fn endurance_writes(&self, page_cycles: u32) -> u64 {
        u64::from(page_cycles) * u64::from(self.entry_count())
    }

    /// Get flash device reference (for testing)
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    fn region_end(&self) -> u32 {
        self.region.first_location + self.region.page_count * self.page_size
    }

    /// Scan and adopt the current slot, or fail with `NotFound`
    fn rescan(&mut self) -> Result<Cursor> {
        match self.find_latest()? {
            Some(cursor) => {
                crate::log_info!(
                    "settings: recovered version {} at {}",
                    cursor.version,
                    cursor.location
                );
                self.cursor = Some(cursor);
                Ok(cursor)
            }
            None => {
                crate::log_warn!("settings: no valid slot in region");
                Err(StoreError::NotFound)
            }
        }
    }

    /// Search the whole region for the highest-version valid slot
    ///
    /// Every slot address is checked: the header's magic byte gates
    /// candidacy, and a candidate beating the best version so far is adopted
    /// only if its recomputed CRC matches the stored trailer. Partial or
    /// interrupted writes fail the CRC check and are skipped.
    fn find_latest(&mut self) -> Result<Option<Cursor>> {
        let slot_words = self.slot_bytes / 4;
        let entries = self.entry_count();

        let mut best: Option<Cursor> = None;
        let mut best_version = 0;

        let mut location = self.region.first_location;
        for _ in 0..entries {
            let header = self.flash.read_word(location)?;
            if let Some(version) = slot::unpack_header(header) {
                if version > best_version {
                    self.crc.reset();
                    for i in 0..slot_words - 1 {
                        let word = self.flash.read_word(location + i * 4)?;
                        self.crc.accumulate(word);
                    }
                    let stored = self.flash.read_word(location + (slot_words - 1) * 4)?;

                    if self.crc.value() == stored {
                        best_version = version;
                        best = Some(Cursor { location, version });
                    }
                }
            }
            location += self.slot_bytes;
        }

        Ok(best)
    }
}
