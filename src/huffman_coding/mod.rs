//! The huffman module turns a frequency table into codes, and codes back into a tree.
//!
//! The tree is built greedily: the two lightest nodes in a min-heap are merged until one
//! remains. Walking it gives every byte value that occurs a prefix-free code. When decoding,
//! the tree is rebuilt from the stored code table alone.
//!
//! Building and walking the tree is inherently sequential and does not benefit from
//! multithreading.
//!

pub mod code_table;
pub mod huffman;
pub mod priority_queue;
