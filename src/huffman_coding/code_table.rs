use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;

use super::huffman::{HuffmanTree, NodeData, NodeId};
use crate::error::HuffError;
use crate::tools::freq_count::FrequencyTable;

/// Longest code the archive can describe (its length field is one byte).
pub const MAX_CODE_LEN: usize = u8::MAX as usize;

/// A bit string, packed most significant bit first. Bits past `len` are always zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    packed: Vec<u8>,
    len: u8,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a code from its packed form. Bits beyond `len` are cleared. Returns None if
    /// `packed` is too short to hold `len` bits.
    pub fn from_packed(packed: &[u8], len: u8) -> Option<Self> {
        let bytes = (len as usize).div_ceil(8);
        if packed.len() < bytes {
            return None;
        }
        let mut packed = packed[..bytes].to_vec();
        let spare = bytes * 8 - len as usize;
        if let Some(last) = packed.last_mut() {
            *last &= 0xff << spare;
        }
        Some(Self { packed, len })
    }

    #[cfg(test)]
    pub(crate) fn from_str_bits(bits: &str) -> Self {
        let mut code = Code::new();
        bits.chars().for_each(|c| code.push(c == '1'));
        code
    }

    /// Append one bit. Callers keep the length at or below MAX_CODE_LEN.
    fn push(&mut self, bit: bool) {
        let bit_offset = self.len % 8;
        if bit_offset == 0 {
            self.packed.push(0);
        }
        if bit {
            if let Some(last) = self.packed.last_mut() {
                *last |= 0x80 >> bit_offset;
            }
        }
        self.len += 1;
    }

    /// Code length in bits.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The code as packed bytes, ceil(len / 8) of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.packed
    }

    #[inline(always)]
    pub fn bit(&self, i: usize) -> bool {
        self.packed[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// Bits from first (root side) to last.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// True if `self` is a prefix of `other` (a code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping. The table owns its codes; trees only hold symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the tree depth first (left = 0, right = 1) and record the path to every leaf. A
    /// tree that is a lone leaf gets the one bit code "0".
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self, HuffError> {
        let mut table = CodeTable::new();

        if let Some(symbol) = tree.symbol(tree.root()) {
            let mut code = Code::new();
            code.push(false);
            table.insert(symbol, code);
            return Ok(table);
        }

        let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::new())];
        while let Some((id, code)) = stack.pop() {
            match tree.node(id).node_data {
                NodeData::Leaf(symbol) => {
                    table.insert(symbol, code);
                }
                NodeData::Kids(kids) => {
                    // Right first so the left branch is walked first
                    for (bit, kid) in kids.iter().enumerate().rev() {
                        if let Some(kid) = kid {
                            if code.len() == MAX_CODE_LEN {
                                return Err(HuffError::CodeTooLong(first_symbol(tree, *kid)));
                            }
                            let mut next = code.clone();
                            next.push(bit == 1);
                            stack.push((*kid, next));
                        }
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    #[inline(always)]
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn sorted(&self) -> Vec<(u8, &Code)> {
        let mut entries: Vec<(u8, &Code)> = self.codes.iter().map(|(&s, c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let entries = self.sorted();
        entries.iter().all(|(a, code_a)| {
            entries
                .iter()
                .all(|(b, code_b)| a == b || !code_a.is_prefix_of(code_b))
        })
    }

    /// Number of payload bits needed to encode input with these frequencies.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        self.codes
            .iter()
            .map(|(&sym, code)| freqs.get(sym) * code.len() as u64)
            .sum()
    }
}

/// Some symbol under `id`, used only to name the offender in an error.
fn first_symbol(tree: &HuffmanTree, mut id: NodeId) -> u8 {
    loop {
        match tree.node(id).node_data {
            NodeData::Leaf(sym) => return sym,
            NodeData::Kids([Some(next), _]) | NodeData::Kids([None, Some(next)]) => id = next,
            NodeData::Kids([None, None]) => return 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs_sequential;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::from_frequencies(&freqs_sequential(data))
            .unwrap()
            .unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    #[test]
    fn packed_code_test() {
        let code = Code::from_str_bits("1011000011");
        assert_eq!(code.len(), 10);
        assert_eq!(code.as_bytes(), &[0b1011_0000, 0b1100_0000]);
        assert_eq!(code.to_string(), "1011000011");
    }

    #[test]
    fn from_packed_clears_spare_bits_test() {
        let code = Code::from_packed(&[0b1111_1111], 3).unwrap();
        assert_eq!(code.as_bytes(), &[0b1110_0000]);
        assert_eq!(code, Code::from_str_bits("111"));
        assert!(Code::from_packed(&[0xff], 9).is_none());
    }

    #[test]
    fn prefix_test() {
        let a = Code::from_str_bits("10");
        let b = Code::from_str_bits("101");
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(!Code::from_str_bits("11").is_prefix_of(&b));
    }

    #[test]
    fn single_symbol_gets_one_bit_test() {
        let table = table_for(&[0x41; 1000]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x41).unwrap().to_string(), "0");
    }

    #[test]
    fn two_symbols_get_one_bit_each_test() {
        let table = table_for(b"AAAABBBB");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b'A').unwrap().to_string(), "0");
        assert_eq!(table.get(b'B').unwrap().to_string(), "1");
    }

    #[test]
    fn prefix_free_test() {
        let all: Vec<u8> = (0..=255_u8)
            .flat_map(|b| std::iter::repeat(b).take(1 + (b as usize % 17) * (b as usize % 5)))
            .collect();
        for data in [
            b"a quick brown fox jumps over the lazy dog".to_vec(),
            all,
            vec![0, 0, 0, 1, 1, 2],
        ] {
            let table = table_for(&data);
            assert!(table.is_prefix_free());
            assert!(table.sorted().iter().all(|(_, c)| !c.is_empty()));
        }
    }

    #[test]
    fn skewed_tree_has_long_codes_test() {
        // Fibonacci weights give a chain shaped tree
        let mut fib = vec![1_u64, 1];
        while fib.len() < 30 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let mut counts = [0_u64; 256];
        for (i, f) in fib.iter().enumerate() {
            counts[i] = *f;
        }
        let freqs = FrequencyTable::from_counts(counts);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        assert_eq!(table.max_len(), 29);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn encoded_bits_test() {
        let freqs = freqs_sequential(b"AAAABBBB");
        let table = table_for(b"AAAABBBB");
        assert_eq!(table.encoded_bits(&freqs), 8);
    }
}
