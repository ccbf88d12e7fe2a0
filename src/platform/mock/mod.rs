//! Mock capability implementations for testing
//!
//! In-memory stand-ins for the flash device, CRC peripheral, and random
//! source, with fault injection hooks for exercising error paths on host.

pub mod crc;
pub mod flash;
pub mod rng;

pub use crc::SoftCrc;
pub use flash::MockFlash;
pub use rng::MockRandom;
