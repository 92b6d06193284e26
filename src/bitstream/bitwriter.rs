use std::io::Write;

use crate::huffman_coding::code_table::Code;

/// Bytes collected before they are handed to the underlying writer.
const BUFFER_SIZE: usize = 8192;

/// Packs bits most significant bit first into bytes and writes them out in BUFFER_SIZE pieces.
pub struct BitWriter<W: Write> {
    /// Handle to the output stream
    writer: W,
    /// Output buffer of completed bytes not yet written.
    output: Vec<u8>,
    /// Partial byte waiting for more bits.
    queue: u8,
    /// Count of valid bits in the queue (0-7).
    q_bits: u8,
    /// Bytes committed so far, including those still in the output buffer.
    committed: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            committed: 0,
        }
    }

    /// Put one bit on the stream. Every eighth bit commits a byte.
    #[inline(always)]
    pub fn put_bit(&mut self, bit: bool) -> std::io::Result<()> {
        self.queue = (self.queue << 1) | bit as u8;
        self.q_bits += 1;
        if self.q_bits == 8 {
            self.commit()?;
        }
        Ok(())
    }

    /// Put all the bits of a code on the stream, first bit first.
    pub fn put_code(&mut self, code: &Code) -> std::io::Result<()> {
        for bit in code.bits() {
            self.put_bit(bit)?;
        }
        Ok(())
    }

    fn commit(&mut self) -> std::io::Result<()> {
        self.output.push(self.queue);
        self.committed += 1;
        self.queue = 0;
        self.q_bits = 0;
        if self.output.len() == BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, and writes out everything still buffered. Consumes the BitWriter, so it
    /// happens exactly once. Returns the writer and the number of bytes written.
    pub fn flush(mut self) -> std::io::Result<(W, usize)> {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits;
            self.commit()?;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()?;
        Ok((self.writer, self.committed))
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.committed, self.q_bits)
    }
}
