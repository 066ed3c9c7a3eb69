use crate::libs::error::TableError;
use crate::libs::table::{length_of, BlockTable};
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockStat {
    pub block_id: String,
    /// Occurrences over all genomes
    pub count: usize,
    pub n_genomes: usize,
    /// Exactly one occurrence in every genome
    pub core: bool,
    /// More than one occurrence in at least one genome
    pub duplicated: bool,
    pub category: String,
    /// Mean occurrence length
    pub len: f64,
}

#[derive(Default)]
struct Tally {
    per_genome: HashMap<String, usize>,
    total_len: u64,
}

pub fn block_stats(
    table: &BlockTable,
    lengths: &HashMap<String, u64>,
) -> Result<Vec<BlockStat>, TableError> {
    let genomes = table.genomes();
    let mut tallies: IndexMap<String, Tally> = IndexMap::new();
    for genome in &genomes {
        let l = length_of(lengths, genome)?;
        for row in table.rows(genome)? {
            let tally = tallies.entry(row.block_id.clone()).or_default();
            *tally.per_genome.entry(genome.to_string()).or_default() += 1;
            tally.total_len += row.span(l);
        }
    }

    let mut stats: Vec<BlockStat> = tallies
        .into_iter()
        .map(|(block_id, tally)| {
            let count: usize = tally.per_genome.values().sum();
            let n_genomes = tally.per_genome.len();
            let duplicated = tally.per_genome.values().any(|&c| c > 1);
            let core = n_genomes == genomes.len() && !duplicated;
            let category = if core {
                "core"
            } else if duplicated {
                "duplicated"
            } else {
                "accessory"
            };
            BlockStat {
                block_id,
                count,
                n_genomes,
                core,
                duplicated,
                category: category.to_string(),
                len: tally.total_len as f64 / count as f64,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.core
            .cmp(&a.core)
            .then(a.duplicated.cmp(&b.duplicated))
            .then(b.count.cmp(&a.count))
            .then(b.len.partial_cmp(&a.len).unwrap_or(Ordering::Equal))
            .then(a.block_id.cmp(&b.block_id))
    });

    Ok(stats)
}
