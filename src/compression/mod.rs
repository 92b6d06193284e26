//! The compression module manages whole file encoding and decoding.
//!
//! Compression happens in the following steps:
//! - Frequency count: Count every byte value across the whole input.
//! - Huffman tree: Merge the lightest nodes until one tree remains.
//! - Code table: Assign each byte value the path to its leaf.
//! - Archive: Write the file name and code table, then the packed codes of the input.
//!
//! Decompression follows the inverse of the compression process.
//! - Parse the header and check the payload size against the table.
//! - Rebuild the tree from the code table.
//! - Walk the tree bit by bit, emitting a byte at every leaf.
//!

pub mod archive;
pub mod compress;
pub mod decompress;
