//! CRC engine capability
//!
//! Accumulator-style CRC interface matching the register model of hardware
//! CRC peripherals: reset the data register, feed words, read the running
//! value out.

/// CRC accumulator interface
pub trait CrcEngine {
    /// Reset the accumulator to its initial state
    fn reset(&mut self);

    /// Feed one 32-bit word into the accumulator
    fn accumulate(&mut self, word: u32);

    /// Read the current accumulated CRC value
    fn value(&self) -> u32;

    /// Compute the CRC of a run of words in one call
    ///
    /// Resets the accumulator, feeds every word, and returns the result.
    /// Used to re-verify candidate slots during a region scan.
    fn block_crc<I>(&mut self, words: I) -> u32
    where
        I: IntoIterator<Item = u32>,
    {
        self.reset();
        for word in words {
            self.accumulate(word);
        }
        self.value()
    }
}
