//! Capability traits consumed by the settings store
//!
//! The store never touches hardware directly; every flash, CRC, and random
//! operation goes through these traits so platform drivers stay isolated and
//! the algorithm can run against host mocks.

pub mod crc;
pub mod flash;
pub mod rng;

// Re-export trait interfaces
pub use crc::CrcEngine;
pub use flash::FlashDevice;
pub use rng::RandomSource;
