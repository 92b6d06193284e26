//! The bitstream module forms the bit level I/O subsystem.
//!
//! BitWriter packs codes into bytes as the payload is written, and BitReader hands the
//! payload back one bit at a time while decoding. Both put the most significant bit first.
//! Only the final byte of a payload is padded, with zeros in its low bits.
//!
pub mod bitreader;
pub mod bitwriter;
