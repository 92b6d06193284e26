use log::{debug, trace};

use super::code_table::CodeTable;
use super::priority_queue::{PriorityQueue, QueueError, QUEUE_CAPACITY};
use crate::error::HuffError;
use crate::tools::freq_count::FrequencyTable;

/// Handle of a node inside a tree's arena.
pub type NodeId = usize;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    /// Children indexed by bit: [0] is left, [1] is right. Trees built from frequencies always
    /// have both; trees rebuilt from an archive may be missing either.
    Kids([Option<NodeId>; 2]),
    Leaf(u8),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    fn leaf(symbol: u8, weight: u64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    fn kids(weight: u64, left: Option<NodeId>, right: Option<NodeId>) -> Node {
        Node {
            weight,
            node_data: NodeData::Kids([left, right]),
        }
    }
}

/// A huffman tree. All nodes are owned by one arena and refer to each other by index, so
/// dropping the tree never walks it.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a frequency table. Returns None when nothing was counted.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Option<Self>, QueueError> {
        Self::build(freqs, |left, right, _| {
            trace!("Merged weights {} + {}", left, right);
        })
    }

    /// Greedy build. `on_merge` sees the two extracted weights and the queue as it stands
    /// after both were removed.
    fn build<F>(freqs: &FrequencyTable, mut on_merge: F) -> Result<Option<Self>, QueueError>
    where
        F: FnMut(u64, u64, &PriorityQueue),
    {
        let mut nodes = Vec::with_capacity(2 * freqs.distinct());
        let mut queue = PriorityQueue::new(QUEUE_CAPACITY);

        for (symbol, count) in freqs.iter() {
            nodes.push(Node::leaf(symbol, count));
            queue.insert(count, nodes.len() - 1)?;
        }
        if queue.is_empty() {
            return Ok(None);
        }

        while queue.len() > 1 {
            let (left_weight, left) = queue.extract_min()?;
            let (right_weight, right) = queue.extract_min()?;
            on_merge(left_weight, right_weight, &queue);

            let weight = left_weight + right_weight;
            nodes.push(Node::kids(weight, Some(left), Some(right)));
            queue.insert(weight, nodes.len() - 1)?;
        }
        let (_, root) = queue.extract_min()?;

        debug!(
            "Built huffman tree: {} leaves, {} nodes, root weight {}",
            freqs.distinct(),
            nodes.len(),
            nodes[root].weight
        );
        Ok(Some(Self { nodes, root }))
    }

    /// Rebuild a tree from a code table alone. Each code is walked from the root, creating
    /// branches as needed, and its last node becomes the leaf. Leaf weights come from `freqs`
    /// and branch weights sum what passes through them.
    pub fn from_codes(table: &CodeTable, freqs: &FrequencyTable) -> Result<Self, HuffError> {
        let mut nodes = vec![Node::kids(0, None, None)];
        let root = 0;

        for (symbol, code) in table.sorted() {
            if code.is_empty() {
                return Err(HuffError::Malformed(format!(
                    "byte {} has an empty code",
                    symbol
                )));
            }
            let weight = freqs.get(symbol);
            let mut current = root;
            nodes[current].weight += weight;

            for bit in code.bits() {
                let next = match &nodes[current].node_data {
                    NodeData::Leaf(other) => {
                        return Err(HuffError::Malformed(format!(
                            "code of byte {} runs through the code of byte {}",
                            symbol, other
                        )))
                    }
                    NodeData::Kids(kids) => kids[bit as usize],
                };
                current = match next {
                    Some(id) => id,
                    None => {
                        nodes.push(Node::kids(0, None, None));
                        let id = nodes.len() - 1;
                        if let NodeData::Kids(kids) = &mut nodes[current].node_data {
                            kids[bit as usize] = Some(id);
                        }
                        id
                    }
                };
                nodes[current].weight += weight;
            }

            if nodes[current].node_data != NodeData::Kids([None, None]) {
                return Err(HuffError::Malformed(format!(
                    "code of byte {} collides with another code",
                    symbol
                )));
            }
            nodes[current].node_data = NodeData::Leaf(symbol);
        }

        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Total weight, which is the number of bytes the tree encodes.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow one bit from `node`. None if that branch does not exist (or `node` is a leaf).
    #[inline(always)]
    pub fn step(&self, node: NodeId, bit: bool) -> Option<NodeId> {
        match &self.nodes[node].node_data {
            NodeData::Kids(kids) => kids[bit as usize],
            NodeData::Leaf(_) => None,
        }
    }

    /// The symbol held by `node`, if it is a leaf.
    #[inline(always)]
    pub fn symbol(&self, node: NodeId) -> Option<u8> {
        match self.nodes[node].node_data {
            NodeData::Leaf(sym) => Some(sym),
            NodeData::Kids(_) => None,
        }
    }
}
