#![cfg_attr(not(test), no_std)]

//! nvstore - Wear-leveling settings storage for MCU internal flash
//!
//! This library persists one small, fixed-size configuration record in raw
//! non-volatile flash, surviving power loss and respecting the limited
//! erase/program-cycle lifetime of flash pages. Successive writes rotate
//! through every slot of a dedicated flash region before any slot is reused,
//! and a CRC trailer committed last makes each slot's validity atomic from a
//! reader's perspective.
//!
//! The store consumes its hardware through three narrow capability traits
//! (flash device, CRC accumulator, random filler source) so the algorithm can
//! be tested on host with the in-memory implementations in [`platform::mock`].

// Capability traits, error types, and mock implementations
pub mod platform;

// The versioned, wear-leveling settings store
pub mod settings;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!,
// log_trace!) are exported at crate root via #[macro_export] in logging
pub mod logging;
