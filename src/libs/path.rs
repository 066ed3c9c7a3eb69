//! Path Model: one genome as a cyclic sequence of oriented block instances.
//!
//! A [`Path`] stores its [`Node`]s in traversal order together with one MSU
//! label and one signature per node. All index arithmetic wraps modulo the
//! number of nodes, so the last node is followed by the first one.

use crate::libs::error::GlueError;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

//----------------------------
// Node
//----------------------------
/// One occurrence of a block in one genome.
///
/// ```
/// # use msu::libs::path::Node;
/// let node = Node::new("RYYAQMEJGY", true, 1);
/// assert_eq!(node.to_string(), "[RYYAQMEJGY|+|1]");
/// assert_eq!(node.invert().to_string(), "[RYYAQMEJGY|-|1]");
/// assert!(node.gluable(&Node::new("RYYAQMEJGY", true, 2)));
/// assert!(!node.gluable(&node.invert()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub block_id: String,
    pub strand: bool,
    pub occ: usize,
}

impl Node {
    pub fn new(block_id: &str, strand: bool, occ: usize) -> Self {
        Self {
            block_id: block_id.to_string(),
            strand,
            occ,
        }
    }

    /// Same block and same strand; the occurrence number is ignored
    pub fn gluable(&self, other: &Node) -> bool {
        self.block_id == other.block_id && self.strand == other.strand
    }

    pub fn invert(&self) -> Node {
        Node {
            block_id: self.block_id.clone(),
            strand: !self.strand,
            occ: self.occ,
        }
    }

    /// Hash of `(block_id, strand)`, shared by all gluable nodes
    pub fn anonymous_hash(&self) -> u64 {
        fxhash::hash64(&(&self.block_id, self.strand))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = if self.strand { "+" } else { "-" };
        write!(f, "[{}|{}|{}]", self.block_id, s, self.occ)
    }
}

//----------------------------
// Edge
//----------------------------
/// A directed adjacency: `node2` immediately follows `node1`.
///
/// Equality and hashing are symmetric under reversal: an edge equals its own
/// inverse, which is the same junction read from the opposite strand.
///
/// ```
/// # use msu::libs::path::{Edge, Node};
/// let a = Node::new("A", true, 1);
/// let b = Node::new("B", false, 1);
/// let e = Edge::new(a.clone(), b.clone());
/// assert_eq!(e, e.invert());
/// assert_eq!(e, Edge::new(b.invert(), a.invert()));
/// assert_ne!(e, Edge::new(b.clone(), a.clone()));
/// ```
#[derive(Clone, Debug)]
pub struct Edge {
    pub node1: Node,
    pub node2: Node,
}

impl Edge {
    pub fn new(node1: Node, node2: Node) -> Self {
        Self { node1, node2 }
    }

    pub fn invert(&self) -> Edge {
        Edge {
            node1: self.node2.invert(),
            node2: self.node1.invert(),
        }
    }

    fn side_eq(&self, other: &Edge) -> bool {
        self.node1.gluable(&other.node1) && self.node2.gluable(&other.node2)
    }

    fn side_hash(&self) -> u64 {
        fxhash::hash64(&(self.node1.anonymous_hash(), self.node2.anonymous_hash()))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.side_eq(other) || self.side_eq(&other.invert())
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.side_hash().wrapping_add(self.invert().side_hash()));
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.node1, self.node2)
    }
}

//----------------------------
// Path
//----------------------------
#[derive(Clone, Debug)]
pub struct Path {
    nodes: Vec<Node>,
    node_pos: HashMap<Node, usize>,
    msu: Vec<usize>,
    signature: Vec<u64>,
}

impl Path {
    /// Every triple must appear once; all labels start at 0
    pub fn new(nodes: Vec<Node>) -> Result<Self, GlueError> {
        if nodes.is_empty() {
            return Err(GlueError::EmptyPath);
        }

        let mut node_pos = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node_pos.insert(node.clone(), i).is_some() {
                return Err(GlueError::DuplicateNode(node.to_string()));
            }
        }

        let n = nodes.len();
        Ok(Self {
            nodes,
            node_pos,
            msu: vec![0; n],
            signature: vec![0; n],
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn msus(&self) -> &[usize] {
        &self.msu
    }

    pub fn signatures(&self) -> &[u64] {
        &self.signature
    }

    pub fn node_idx(&self, node: &Node) -> Result<usize, GlueError> {
        self.node_pos
            .get(node)
            .copied()
            .ok_or_else(|| GlueError::UnknownNode(node.to_string()))
    }

    /// ```
    /// # use msu::libs::path::{Node, Path};
    /// let nodes = vec![
    ///     Node::new("A", true, 1),
    ///     Node::new("B", true, 1),
    ///     Node::new("C", false, 1),
    /// ];
    /// let path = Path::new(nodes.clone()).unwrap();
    /// assert_eq!(path.next_node_idx(&nodes[2], true).unwrap(), 0);
    /// assert_eq!(path.next_node_idx(&nodes[0], false).unwrap(), 2);
    /// assert_eq!(path.next_node_idx(&nodes[1], true).unwrap(), 2);
    /// ```
    pub fn next_node_idx(&self, node: &Node, fwd: bool) -> Result<usize, GlueError> {
        let pos = self.node_idx(node)?;
        let n = self.nodes.len();
        Ok(if fwd { (pos + 1) % n } else { (pos + n - 1) % n })
    }

    pub fn next_node(&self, node: &Node, fwd: bool) -> Result<&Node, GlueError> {
        Ok(&self.nodes[self.next_node_idx(node, fwd)?])
    }

    /// The edge leaving `node` in the given direction, always written in path order
    pub fn next_edge(&self, node: &Node, fwd: bool) -> Result<Edge, GlueError> {
        let next = self.next_node(node, fwd)?.clone();
        Ok(if fwd {
            Edge::new(node.clone(), next)
        } else {
            Edge::new(next, node.clone())
        })
    }

    pub fn get_msu(&self, node: &Node) -> Result<usize, GlueError> {
        Ok(self.msu[self.node_idx(node)?])
    }

    pub fn get_signature(&self, node: &Node) -> Result<u64, GlueError> {
        Ok(self.signature[self.node_idx(node)?])
    }

    pub fn set_msu(&mut self, node: &Node, msu_id: usize, signature: u64) -> Result<(), GlueError> {
        let idx = self.node_idx(node)?;
        self.msu[idx] = msu_id;
        self.signature[idx] = signature;
        Ok(())
    }

    /// Rewrites every `old_id` label to `new_id` in one pass
    pub fn remap_msu(&mut self, old_id: usize, new_id: usize) {
        for msu in self.msu.iter_mut() {
            if *msu == old_id {
                *msu = new_id;
            }
        }
    }

    /// Applies a complete id mapping; ids missing from the map are kept
    pub fn relabel(&mut self, map: &HashMap<usize, usize>) {
        for msu in self.msu.iter_mut() {
            if let Some(&new_id) = map.get(msu) {
                *msu = new_id;
            }
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.nodes.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", parts.join("---"))
    }
}
