//! BitReader: reads the packed payload of an archive one bit at a time.
//!
//! Bits come out most significant bit first, the order BitWriter put them in. The reader knows
//! nothing about padding; the decoder decides when to stop.

const BIT_MASK: u8 = 0x80;

/// Reads bits from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Return the next bit, *true* for 1, or None if there is no more data to read.
    #[inline(always)]
    pub fn bit(&mut self) -> Option<bool> {
        let byte = *self.buffer.get(self.cursor)?;
        let bit = byte & (BIT_MASK >> self.bit_index) != 0;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Some(bit)
    }

    /// Bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.cursor as u64 * 8 + self.bit_index as u64
    }

    /// Bits left before the end of the data.
    pub fn remaining_bits(&self) -> u64 {
        self.buffer.len() as u64 * 8 - self.bits_read()
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
