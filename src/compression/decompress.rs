use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::archive::{bytes_to_path, check_extension, ArchiveHeader};
use crate::bitstream::bitreader::BitReader;
use crate::error::HuffError;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::HuffOpts;

/// The contents of a decoded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// File name recorded when the archive was made
    pub file_name: Vec<u8>,
    pub data: Vec<u8>,
}

/// Decompress the archive named in opts. The result goes to opts.output if set, otherwise to
/// the file name recorded in the archive. Returns the path written.
pub fn decompress(opts: &HuffOpts) -> Result<PathBuf, HuffError> {
    let input = Path::new(&opts.file);
    check_extension(input)?;

    // The whole archive is held for the duration of the decode
    let archive = fs::read(input)?;
    let decoded = decode(&archive)?;

    let output = match &opts.output {
        Some(out) => PathBuf::from(out),
        None => bytes_to_path(&decoded.file_name),
    };
    if output.as_os_str().is_empty() {
        return Err(HuffError::Malformed("archive records an empty file name".to_string()));
    }

    let mut f_out = BufWriter::new(File::create(&output)?);
    f_out.write_all(&decoded.data)?;
    f_out.flush()?;

    info!("Restored {} bytes into {}", decoded.data.len(), output.display());
    Ok(output)
}

/// Decode a complete archive held in memory.
pub fn decode(archive: &[u8]) -> Result<Decoded, HuffError> {
    let (header, payload) = ArchiveHeader::parse(archive)?;
    debug!(
        "Archive header: {} table entries, {} bytes to restore, {} payload bytes",
        header.codes.len(),
        header.symbol_count(),
        payload.len()
    );

    // The table fixes the exact payload size
    let payload_bits = header.payload_bits();
    let expected = payload_bits.div_ceil(8);
    if payload.len() as u64 != expected {
        return Err(HuffError::PayloadLength {
            expected,
            found: payload.len() as u64,
        });
    }

    let data = if header.codes.is_empty() {
        Vec::new()
    } else {
        let tree = HuffmanTree::from_codes(&header.codes, &header.freqs)?;
        decode_payload(&tree, payload, header.symbol_count())?
    };

    Ok(Decoded {
        file_name: header.file_name,
        data,
    })
}

/// Walk the tree one payload bit at a time (0 = left, 1 = right), emitting a symbol at every
/// leaf, until `count` symbols are out. Whatever follows must be zero padding.
fn decode_payload(tree: &HuffmanTree, payload: &[u8], count: u64) -> Result<Vec<u8>, HuffError> {
    let mut br = BitReader::new(payload);
    let mut result = Vec::with_capacity(count as usize);
    let mut current = tree.root();

    while (result.len() as u64) < count {
        let bit = br.bit().ok_or(HuffError::Truncated("payload"))?;
        current = tree.step(current, bit).ok_or_else(|| {
            HuffError::Malformed(format!("payload bit at {} leaves the code tree", br.loc()))
        })?;
        if let Some(symbol) = tree.symbol(current) {
            result.push(symbol);
            current = tree.root();
        }
    }

    if br.remaining_bits() >= 8 {
        return Err(HuffError::Malformed(format!(
            "{} unused payload bits after the last symbol",
            br.remaining_bits()
        )));
    }
    while let Some(bit) = br.bit() {
        if bit {
            return Err(HuffError::Malformed("padding bits are not zero".to_string()));
        }
    }
    Ok(result)
}
