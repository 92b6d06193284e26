//! Byte oriented huffman compression.
//!
//! Provides lossless compression and decompression of single files into self-describing
//! `.huff` archives.
//!
//! The whole input is scanned first (in parallel for large files) to count how often every
//! byte value occurs. Those counts build one huffman tree, the tree yields a prefix-free code
//! per byte value, and the archive stores the original file name, the code table and the
//! bit-packed codes of the input. Decoding rebuilds the tree from the stored table and walks
//! it bit by bit.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huff -e test.txt`
//!
//! This will create the archive encrypted.huff. `huff -d encrypted.huff` recreates test.txt.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, encode, EncodeStats};
pub use compression::decompress::{decode, decompress, Decoded};
pub use error::HuffError;
