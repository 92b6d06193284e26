use std::path::PathBuf;

use thiserror::Error;

use crate::huffman_coding::priority_queue::QueueError;

/// Every failure the encoder and decoder can report. None of them are recoverable; the
/// enclosing encode or decode stops at the first one.
#[derive(Error, Debug)]
pub enum HuffError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Priority queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Could not start the frequency counting threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid file format. Expected a .huff file, got {}", .0.display())]
    BadExtension(PathBuf),

    #[error("Archive ended while reading the {0}")]
    Truncated(&'static str),

    #[error("Malformed archive: {0}")]
    Malformed(String),

    #[error("Payload holds {found} bytes, but the code table calls for {expected}")]
    PayloadLength { expected: u64, found: u64 },

    #[error("Byte {symbol} occurs {count} times, more than the archive can record")]
    FrequencyOverflow { symbol: u8, count: u64 },

    #[error("The code for byte {0} is longer than 255 bits")]
    CodeTooLong(u8),
}
