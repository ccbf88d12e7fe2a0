//! Software CRC engine
//!
//! Implements [`CrcEngine`] in software using CRC-32/MPEG-2, the algorithm
//! computed by the STM32 family's hardware CRC peripheral (polynomial
//! 0x04C11DB7, init 0xFFFFFFFF, no reflection, no final xor). Words are fed
//! most-significant byte first, matching how the peripheral consumes its
//! 32-bit data register.

use crc::{Crc, CRC_32_MPEG_2};
use heapless::Vec;

use crate::platform::traits::CrcEngine;

/// CRC-32/MPEG-2 algorithm (STM32 hardware CRC)
static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Maximum accumulated data between resets (one slot's worth)
const ACCUM_CAPACITY: usize = 1024;

/// Software CRC accumulator
///
/// Buffers fed words and checksums them on demand. The buffer bounds the
/// data covered by a single accumulation run; the store only ever
/// accumulates one slot between resets.
#[derive(Debug, Default)]
pub struct SoftCrc {
    buf: Vec<u8, ACCUM_CAPACITY>,
}

impl SoftCrc {
    /// Create a new software CRC engine
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }
}

impl CrcEngine for SoftCrc {
    fn reset(&mut self) {
        self.buf.clear();
    }

    fn accumulate(&mut self, word: u32) {
        self.buf.extend_from_slice(&word.to_be_bytes()).ok();
    }

    fn value(&self) -> u32 {
        CRC32.checksum(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_direct_checksum() {
        let mut engine = SoftCrc::new();
        engine.reset();
        engine.accumulate(0xBE00_0001);
        engine.accumulate(0xDEAD_BEEF);

        let expected = CRC32.checksum(&[0xBE, 0x00, 0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(engine.value(), expected);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut engine = SoftCrc::new();
        engine.reset();
        engine.accumulate(0x1234_5678);
        let first = engine.value();

        engine.reset();
        engine.accumulate(0x1234_5678);
        assert_eq!(engine.value(), first);
    }

    #[test]
    fn test_different_input_different_crc() {
        let mut engine = SoftCrc::new();
        engine.reset();
        engine.accumulate(1);
        let a = engine.value();

        engine.reset();
        engine.accumulate(2);
        assert_ne!(a, engine.value());
    }

    #[test]
    fn test_block_crc_equals_manual_accumulation() {
        let words = [0xBE00_0003, 1, 2, 3, 0xCAFE_F00D];

        let mut engine = SoftCrc::new();
        engine.reset();
        for w in words {
            engine.accumulate(w);
        }
        let manual = engine.value();

        assert_eq!(engine.block_crc(words), manual);
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let mut engine = SoftCrc::new();
        let original = engine.block_crc([0xBE00_0001, 42]);
        let flipped = engine.block_crc([0xBE00_0001, 43]);
        assert_ne!(original, flipped);
    }
}
