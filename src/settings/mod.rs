//! Versioned settings storage in raw flash
//!
//! One fixed-size record, stored as a rotating sequence of versioned,
//! CRC-trailed slots across a dedicated flash region. The highest valid
//! version wins on recovery; writes spread across every slot before any
//! flash location is reused.

pub mod slot;
pub mod store;

// Re-export commonly used types
pub use slot::{entry_count, pack_header, slot_bytes, unpack_header};
pub use slot::{SETTINGS_MAGIC, SLOT_OVERHEAD_BYTES, VERSION_MASK};
pub use store::{Region, SettingsStore, StoreStats};
