//! Synteny Gluer: partition shared blocks of two genomes into Minimal Synteny Units.
//!
//! # Algorithm Overview
//!
//! 1. **Seeds**: one pair of nodes per core block, `(n1 in genome 1, n2 in genome 2)`.
//! 2. **Anchor**: the seed pair gets a candidate MSU id and a signature.
//! 3. **Gluing**: from the anchor, both genomes are walked in lock-step, once
//!    forward and once backward. The walk goes on while the next edges of both
//!    genomes are equal (see [`Edge`](crate::libs::path::Edge)) and the next
//!    nodes are unlabeled.
//! 4. **Merging**: a walk that runs into a pair labeled with one common id has
//!    met the same run from another seed; that id is retired and rewritten to
//!    the candidate id in both genomes before the next seed.
//! 5. **Finalization**: ids are compacted to `1..=k`; 0 means "no unit".

use crate::libs::error::GlueError;
use crate::libs::path::{Node, Path};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One row of the MSU table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsuRecord {
    pub block_id: String,
    #[serde(with = "crate::libs::table::strand")]
    pub strand: bool,
    pub occurrence_number: usize,
    pub msu: usize,
    pub signature: u64,
    pub genome: String,
}

/// Signature of a pair of nodes labeled together
pub fn pair_signature(n1: &Node, n2: &Node) -> u64 {
    fxhash::hash64(&(n1, n2))
}

/// Dense mapping of `ids` onto `0..k`, 0 always mapped to 0
///
/// ```
/// # use msu::libs::glue::compact_ids;
/// let map = compact_ids([0, 7, 3, 7, 12].into_iter());
/// assert_eq!(map[&0], 0);
/// assert_eq!(map[&3], 1);
/// assert_eq!(map[&7], 2);
/// assert_eq!(map[&12], 3);
/// ```
pub fn compact_ids(ids: impl Iterator<Item = usize>) -> HashMap<usize, usize> {
    ids.chain(std::iter::once(0))
        .sorted()
        .dedup()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect()
}

pub struct Gluer {
    name1: String,
    path1: Path,
    name2: String,
    path2: Path,
}

impl Gluer {
    pub fn new(name1: &str, path1: Path, name2: &str, path2: Path) -> Self {
        Self {
            name1: name1.to_string(),
            path1,
            name2: name2.to_string(),
            path2,
        }
    }

    pub fn names(&self) -> (&str, &str) {
        (&self.name1, &self.name2)
    }

    pub fn path1(&self) -> &Path {
        &self.path1
    }

    pub fn path2(&self) -> &Path {
        &self.path2
    }

    /// One seed per block occurring exactly once in each genome, ordered by block id
    pub fn core_seeds(&self) -> Vec<(Node, Node)> {
        let single = |path: &Path| -> BTreeMap<String, Node> {
            let counts = path.nodes().iter().counts_by(|n| n.block_id.clone());
            path.nodes()
                .iter()
                .filter(|n| counts[&n.block_id] == 1)
                .map(|n| (n.block_id.clone(), n.clone()))
                .collect()
        };

        let core1 = single(&self.path1);
        let core2 = single(&self.path2);
        core1
            .into_iter()
            .filter_map(|(bid, n1)| core2.get(&bid).map(|n2| (n1, n2.clone())))
            .collect()
    }

    /// Extends every seed in order, candidate ids `1, 2, 3, …`
    pub fn run(&mut self, seeds: &[(Node, Node)]) -> Result<(), GlueError> {
        let mut msu_id = 1;
        let mut anchored = 0;
        for (n1, n2) in seeds {
            if self.extend(n1, n2, msu_id)? {
                anchored += 1;
            }
            msu_id += 1;
        }
        info!(
            "Glued {} seeds, {} new anchors, {} + {} nodes",
            seeds.len(),
            anchored,
            self.path1.len(),
            self.path2.len()
        );
        Ok(())
    }

    fn remap_msu(&mut self, old_id: usize, new_id: usize) {
        self.path1.remap_msu(old_id, new_id);
        self.path2.remap_msu(old_id, new_id);
    }

    /// Labels the anchor pair with `msu_id` and glues both sides.
    ///
    /// Returns `false` when the pair already belonged to a unit, in which case
    /// `msu_id` is not used.
    pub fn extend(&mut self, n1: &Node, n2: &Node, msu_id: usize) -> Result<bool, GlueError> {
        debug_assert!(msu_id != 0);
        debug!("Extending {} and {}", n1, n2);
        if n1.block_id != n2.block_id {
            return Err(GlueError::InvalidSeed(n1.to_string(), n2.to_string()));
        }

        let x = self.path1.get_msu(n1)?;
        let y = self.path2.get_msu(n2)?;
        if x != 0 || y != 0 {
            if x != y {
                return Err(GlueError::InconsistentLabel {
                    node1: n1.to_string(),
                    msu1: x,
                    node2: n2.to_string(),
                    msu2: y,
                });
            }
            debug!("Already assigned {} and {} to {}", n1, n2, x);
            return Ok(false);
        }

        let signature = pair_signature(n1, n2);
        self.path1.set_msu(n1, msu_id, signature)?;
        self.path2.set_msu(n2, msu_id, signature)?;

        let merges = [
            self.glue_side(n1, n2, true, msu_id)?,
            self.glue_side(n1, n2, false, msu_id)?,
        ];
        for (old_id, new_id) in merges.into_iter().flatten() {
            if old_id != new_id {
                debug!("Merging MSU {} into {}", old_id, new_id);
                self.remap_msu(old_id, new_id);
            }
        }

        Ok(true)
    }

    fn compare(&self, n1: &Node, n2: &Node, s1: bool, s2: bool) -> Result<bool, GlueError> {
        let e1 = self.path1.next_edge(n1, s1)?;
        let e2 = self.path2.next_edge(n2, s2)?;
        let same = e1 == e2;
        trace!("Comparing {} and {}: {}", e1, e2, same);
        Ok(same)
    }

    /// Walks one side of an anchor.
    ///
    /// Returns `Some((old_id, msu_id))` when the walk met a pair already
    /// labeled `old_id` in both genomes.
    fn glue_side(
        &mut self,
        n1: &Node,
        n2: &Node,
        fwd: bool,
        msu_id: usize,
    ) -> Result<Option<(usize, usize)>, GlueError> {
        let s1 = if fwd { n1.strand } else { !n1.strand };
        let s2 = if fwd { n2.strand } else { !n2.strand };
        trace!("Gluing side {} of {} and {}", fwd, n1, n2);

        let mut n1 = n1.clone();
        let mut n2 = n2.clone();
        while self.compare(&n1, &n2, s1, s2)? {
            let nn1 = self.path1.next_node(&n1, s1)?.clone();
            let nn2 = self.path2.next_node(&n2, s2)?.clone();

            let old1 = self.path1.get_msu(&nn1)?;
            let old2 = self.path2.get_msu(&nn2)?;
            if old1 != 0 || old2 != 0 {
                trace!("Already assigned {} -> {} or {} -> {}", nn1, old1, nn2, old2);
                return Ok(if old1 == old2 {
                    Some((old1, msu_id))
                } else {
                    None
                });
            }

            trace!("Assigning {} and {} to {}", nn1, nn2, msu_id);
            let signature = pair_signature(&nn1, &nn2);
            self.path1.set_msu(&nn1, msu_id, signature)?;
            self.path2.set_msu(&nn2, msu_id, signature)?;
            n1 = nn1;
            n2 = nn2;
        }

        Ok(None)
    }

    /// Compacts ids in place and returns the rows of both genomes.
    pub fn finalize(&mut self) -> Vec<MsuRecord> {
        let map = compact_ids(
            self.path1
                .msus()
                .iter()
                .chain(self.path2.msus().iter())
                .copied(),
        );
        self.path1.relabel(&map);
        self.path2.relabel(&map);

        let mut records = Vec::with_capacity(self.path1.len() + self.path2.len());
        for (name, path) in [(&self.name1, &self.path1), (&self.name2, &self.path2)] {
            for ((node, &msu), &signature) in path
                .nodes()
                .iter()
                .zip(path.msus())
                .zip(path.signatures())
            {
                records.push(MsuRecord {
                    block_id: node.block_id.clone(),
                    strand: node.strand,
                    occurrence_number: node.occ,
                    msu,
                    signature,
                    genome: name.clone(),
                });
            }
        }
        info!("{} MSUs", map.len() - 1);
        records
    }
}

/// Checks the 2:1 law between labeled nodes and signatures.
///
/// Returns the number of distinct non-zero MSU ids.
pub fn check_signatures(records: &[MsuRecord]) -> Result<usize, GlueError> {
    let labeled: Vec<&MsuRecord> = records.iter().filter(|r| r.msu != 0).collect();
    let by_signature = labeled.iter().into_group_map_by(|r| r.signature);

    if labeled.len() != 2 * by_signature.len() {
        return Err(GlueError::SignatureMismatch(format!(
            "found {} labeled nodes but {} unique signatures",
            labeled.len(),
            by_signature.len()
        )));
    }

    for (signature, group) in &by_signature {
        let ok = group.len() == 2
            && group[0].genome != group[1].genome
            && group[0].msu == group[1].msu;
        if !ok {
            let nodes = group
                .iter()
                .map(|r| format!("{}:{}#{}", r.genome, r.block_id, r.msu))
                .join(",");
            warn!("Signature {} carried by {}", signature, nodes);
            return Err(GlueError::SignatureMismatch(format!(
                "signature {} is carried by [{}]",
                signature, nodes
            )));
        }
    }

    Ok(labeled.iter().map(|r| r.msu).unique().count())
}
