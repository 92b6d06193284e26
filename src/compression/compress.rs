use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};

use super::archive::{path_to_bytes, ArchiveHeader, ARCHIVE_EXTENSION};
use crate::bitstream::bitwriter::BitWriter;
use crate::error::HuffError;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::{HuffOpts, DEFAULT_ARCHIVE};
use crate::tools::freq_count::freqs;

/// Sizes reported after an encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Bytes of input
    pub input_bytes: u64,
    /// Distinct byte values in the input
    pub symbols: usize,
    /// Header bytes, file name and code table included
    pub header_bytes: usize,
    /// Meaningful payload bits (excludes the final padding)
    pub payload_bits: u64,
    /// Payload bytes
    pub payload_bytes: usize,
}

impl EncodeStats {
    pub fn archive_bytes(&self) -> usize {
        self.header_bytes + self.payload_bytes
    }
}

/// Compress the file named in opts into the archive named by opts.output (or encrypted.huff).
pub fn compress(opts: &HuffOpts) -> Result<EncodeStats, HuffError> {
    let input = Path::new(&opts.file);
    let output = Path::new(opts.output.as_deref().unwrap_or(DEFAULT_ARCHIVE));
    if output.extension().map_or(true, |ext| ext != ARCHIVE_EXTENSION) {
        warn!(
            "{} does not end in .{}, it will have to be renamed before it can be decoded",
            output.display(),
            ARCHIVE_EXTENSION
        );
    }

    // The whole input is held for the duration of the encode
    let data = fs::read(input)?;
    info!("Read {} bytes from {}", data.len(), input.display());

    let f_out = File::create(output)?;
    let stats = encode(&path_to_bytes(input), &data, opts.threads, BufWriter::new(f_out))?;

    info!(
        "Wrote {} ({} bytes, {:.1}% of the original)",
        output.display(),
        stats.archive_bytes(),
        ratio(stats.archive_bytes() as u64, stats.input_bytes)
    );
    Ok(stats)
}

/// Encode `data` into `writer` as a complete archive that records `file_name`.
pub fn encode<W: Write>(
    file_name: &[u8],
    data: &[u8],
    threads: usize,
    mut writer: W,
) -> Result<EncodeStats, HuffError> {
    // Every counting thread is joined before freqs returns
    let freqs = freqs(data, threads)?;

    let codes = match HuffmanTree::from_frequencies(&freqs)? {
        Some(tree) => CodeTable::from_tree(&tree)?,
        None => {
            info!("Input is empty, writing an archive with no table and no payload");
            CodeTable::new()
        }
    };
    debug!(
        "Code table has {} entries, longest code {} bits",
        codes.len(),
        codes.max_len()
    );

    let header = ArchiveHeader {
        file_name: file_name.to_vec(),
        freqs,
        codes,
    };
    let header_bytes = header.write_to(&mut writer)?;

    let mut bw = BitWriter::new(writer);
    for &byte in data {
        match header.codes.get(byte) {
            Some(code) => bw.put_code(code)?,
            None => {
                return Err(HuffError::Malformed(format!(
                    "byte {} is missing from the code table",
                    byte
                )))
            }
        }
    }
    let (_, payload_bytes) = bw.flush()?;

    Ok(EncodeStats {
        input_bytes: data.len() as u64,
        symbols: header.codes.len(),
        header_bytes,
        payload_bits: header.payload_bits(),
        payload_bytes,
    })
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode_vec(name: &str, data: &[u8], threads: usize) -> (Vec<u8>, EncodeStats) {
        let mut out = Vec::new();
        let stats = encode(name.as_bytes(), data, threads, &mut out).unwrap();
        (out, stats)
    }

    #[test]
    fn two_symbol_payload_is_one_byte_test() {
        let (out, stats) = encode_vec("ab", b"AAAABBBB", 1);
        assert_eq!(stats.payload_bits, 8);
        assert_eq!(stats.payload_bytes, 1);
        assert_eq!(out.len(), stats.archive_bytes());
        assert_eq!(*out.last().unwrap(), 0b0000_1111);
    }

    #[test]
    fn single_symbol_payload_test() {
        let (out, stats) = encode_vec("a", &[0x41; 1000], 4);
        assert_eq!(stats.symbols, 1);
        assert_eq!(stats.payload_bits, 1000);
        assert_eq!(stats.payload_bytes, 125);
        assert!(out[stats.header_bytes..].iter().all(|&b| b == 0));
    }

    #[test]
    fn padding_test() {
        // a=0, b=10, c=11
        let (out, stats) = encode_vec("p", b"aabc", 1);
        assert_eq!(stats.payload_bits, 6);
        assert_eq!(stats.payload_bytes, 1);
        assert_eq!(out[stats.header_bytes..], [0b0010_1100]);
    }

    #[test]
    fn empty_input_test() {
        let (out, stats) = encode_vec("nothing", b"", 4);
        assert_eq!(stats.symbols, 0);
        assert_eq!(stats.payload_bytes, 0);
        assert_eq!(out.len(), 8 + 7 + 4);
    }

    #[test]
    fn deterministic_across_threads_test() {
        let data: Vec<u8> = (0..300_000_u32)
            .map(|i| ((i * 31 + i / 7) % 251) as u8 ^ (i % 3) as u8)
            .collect();
        let (first, _) = encode_vec("same.bin", &data, 1);
        for threads in [1, 2, 4, 8] {
            let (again, _) = encode_vec("same.bin", &data, threads);
            assert_eq!(again, first);
        }
    }
}
