//! Layout of a `.huff` archive. All integers are little endian.
//!
//! ```text
//! u64            length of the original file name
//! [u8]           file name bytes
//! u32            number of table entries (0-256)
//! per entry, ascending by symbol:
//!   u8           symbol
//!   u32          frequency
//!   u8           code length in bits
//!   [u8]         code bits, msb first, ceil(len / 8) bytes
//! [u8]           payload: the code of every input byte, msb first, last byte zero padded
//! ```

use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::HuffError;
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::tools::freq_count::{FrequencyTable, ALPHABET_SIZE};

/// Extension a file must carry to be accepted for decoding.
pub const ARCHIVE_EXTENSION: &str = "huff";

/// Everything in front of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Name of the original file, as given when it was encoded.
    pub file_name: Vec<u8>,
    pub freqs: FrequencyTable,
    pub codes: CodeTable,
}

impl ArchiveHeader {
    /// Number of bytes the payload decodes to.
    pub fn symbol_count(&self) -> u64 {
        self.freqs.total()
    }

    /// Number of meaningful payload bits.
    pub fn payload_bits(&self) -> u64 {
        self.codes.encoded_bits(&self.freqs)
    }

    /// Write the header, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, HuffError> {
        let mut written = 0;

        w.write_u64::<LittleEndian>(self.file_name.len() as u64)?;
        w.write_all(&self.file_name)?;
        written += 8 + self.file_name.len();

        w.write_u32::<LittleEndian>(self.codes.len() as u32)?;
        written += 4;

        for (symbol, code) in self.codes.sorted() {
            let count = self.freqs.get(symbol);
            let frequency = u32::try_from(count)
                .map_err(|_| HuffError::FrequencyOverflow { symbol, count })?;
            let len = u8::try_from(code.len()).map_err(|_| HuffError::CodeTooLong(symbol))?;

            w.write_u8(symbol)?;
            w.write_u32::<LittleEndian>(frequency)?;
            w.write_u8(len)?;
            w.write_all(code.as_bytes())?;
            written += 6 + code.as_bytes().len();
        }
        Ok(written)
    }

    /// Parse the header at the front of `data`, returning it with the payload that follows.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), HuffError> {
        let mut cursor = Cursor::new(data);

        let name_len = field(cursor.read_u64::<LittleEndian>(), "file name length")?;
        if name_len > remaining(&cursor) {
            return Err(HuffError::Truncated("file name"));
        }
        let mut file_name = vec![0_u8; name_len as usize];
        field(cursor.read_exact(&mut file_name), "file name")?;

        let entries = field(cursor.read_u32::<LittleEndian>(), "table entry count")?;
        if entries as usize > ALPHABET_SIZE {
            return Err(HuffError::Malformed(format!(
                "table claims {} entries, at most {} are possible",
                entries, ALPHABET_SIZE
            )));
        }

        let mut counts = [0_u64; ALPHABET_SIZE];
        let mut codes = CodeTable::new();
        for _ in 0..entries {
            let symbol = field(cursor.read_u8(), "table entry symbol")?;
            let frequency = field(cursor.read_u32::<LittleEndian>(), "table entry frequency")?;
            let len = field(cursor.read_u8(), "table entry code length")?;
            if len == 0 {
                return Err(HuffError::Malformed(format!(
                    "byte {} has an empty code",
                    symbol
                )));
            }
            let mut packed = vec![0_u8; (len as usize).div_ceil(8)];
            field(cursor.read_exact(&mut packed), "table entry code")?;
            let code = Code::from_packed(&packed, len).ok_or(HuffError::Truncated("table entry code"))?;

            if codes.insert(symbol, code).is_some() {
                return Err(HuffError::Malformed(format!(
                    "byte {} appears twice in the table",
                    symbol
                )));
            }
            counts[symbol as usize] = frequency as u64;
        }

        let offset = cursor.position() as usize;
        let header = ArchiveHeader {
            file_name,
            freqs: FrequencyTable::from_counts(counts),
            codes,
        };
        Ok((header, &data[offset..]))
    }
}

/// Map a short read to the name of the field that was cut off.
fn field<T>(result: io::Result<T>, what: &'static str) -> Result<T, HuffError> {
    result.map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffError::Truncated(what),
        _ => HuffError::Io(e),
    })
}

fn remaining(cursor: &Cursor<&[u8]>) -> u64 {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position())
}

/// Refuse anything that does not end in `.huff`.
pub fn check_extension(path: &Path) -> Result<(), HuffError> {
    match path.extension() {
        Some(ext) if ext == ARCHIVE_EXTENSION => Ok(()),
        _ => Err(HuffError::BadExtension(path.to_path_buf())),
    }
}

/// File name bytes as stored in the header.
#[cfg(unix)]
pub fn path_to_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
pub fn path_to_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().as_bytes().to_vec()
}

/// Path for file name bytes read from a header.
#[cfg(unix)]
pub fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
