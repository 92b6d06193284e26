use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use rayon::prelude::*;

use crate::error::HuffError;

/// Number of distinct symbols (byte values).
pub const ALPHABET_SIZE: usize = 256;

/// Below this size the input is counted on the calling thread.
const PARALLEL_THRESHOLD: usize = 64_000;

/// Occurrence count of every byte value in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Wrap a full set of counts.
    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// (symbol, count) for every symbol that occurs, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(sym, &count)| (sym as u8, count))
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }
}

/// Returns a frequency count of the input data. Uses `threads` workers when the data set is over 64k.
pub fn freqs(data: &[u8], threads: usize) -> Result<FrequencyTable, HuffError> {
    if threads <= 1 || data.len() < PARALLEL_THRESHOLD {
        Ok(freqs_sequential(data))
    } else {
        freqs_parallel(data, threads)
    }
}

/// Single pass count on the calling thread.
pub(crate) fn freqs_sequential(data: &[u8]) -> FrequencyTable {
    let mut counts = [0_u64; ALPHABET_SIZE];
    data.iter().for_each(|&el| counts[el as usize] += 1);
    FrequencyTable::from_counts(counts)
}

/// Split the data into at most `threads` contiguous chunks and count them on a dedicated pool,
/// every chunk adding into one shared atomic table. The table is only read after `install`
/// returns, which is after every chunk is done.
pub(crate) fn freqs_parallel(data: &[u8], threads: usize) -> Result<FrequencyTable, HuffError> {
    let threads = threads.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let shared: [AtomicU64; ALPHABET_SIZE] = std::array::from_fn(|_| AtomicU64::new(0));
    let chunk_size = data.len().div_ceil(threads).max(1);
    debug!(
        "Counting {} bytes on {} threads, {} bytes per chunk",
        data.len(),
        threads,
        chunk_size
    );

    pool.install(|| {
        data.par_chunks(chunk_size).for_each(|chunk| {
            chunk
                .iter()
                .for_each(|&el| {
                    shared[el as usize].fetch_add(1, Ordering::Relaxed);
                });
        })
    });

    let mut counts = [0_u64; ALPHABET_SIZE];
    for (count, slot) in counts.iter_mut().zip(shared.iter()) {
        *count = slot.load(Ordering::Acquire);
    }
    Ok(FrequencyTable::from_counts(counts))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        // Cheap deterministic skewed data
        let mut x: u32 = 0x2545_f491;
        (0..len)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                ((x % 97) as u8).wrapping_mul((x % 3) as u8)
            })
            .collect()
    }

    #[test]
    fn sequential_count_test() {
        let table = freqs_sequential(b"abracadabra");
        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct(), 5);
    }

    #[test]
    fn iter_skips_absent_symbols_test() {
        let table = freqs_sequential(&[3, 1, 3, 255]);
        let seen: Vec<(u8, u64)> = table.iter().collect();
        assert_eq!(seen, vec![(1, 1), (3, 2), (255, 1)]);
    }

    #[test]
    fn parallel_matches_sequential_test() {
        let data = sample(200_003);
        let expected = freqs_sequential(&data);
        for threads in [1, 2, 3, 4, 7, 16] {
            assert_eq!(freqs_parallel(&data, threads).unwrap(), expected);
        }
    }

    #[test]
    fn parallel_tiny_input_test() {
        // More threads than bytes must neither skip nor double count
        let data = [7_u8, 7, 9];
        let table = freqs_parallel(&data, 8).unwrap();
        assert_eq!(table.get(7), 2);
        assert_eq!(table.get(9), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn empty_input_test() {
        let table = freqs(&[], 4).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(freqs_parallel(&[], 4).unwrap().is_empty());
    }
}
