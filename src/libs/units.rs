use crate::libs::error::TableError;
use crate::libs::glue::MsuRecord;
use crate::libs::table::{index_msus, lookup_msu, BlockTable};
use itertools::Itertools;
use serde::Serialize;

/// Extent of one MSU along one genome
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitRow {
    pub msu: usize,
    pub genome: String,
    pub n_blocks: usize,
    /// Path index of the first block
    pub first: usize,
    /// Path index of the last block
    pub last: usize,
    pub start_position: u64,
    pub end_position: u64,
}

/// Cyclic index range `(start, end)` of the run labeled `m`.
///
/// `start` is the first index labeled `m` right after one that is not. A
/// run covering the whole path is `(0, n - 1)`.
///
/// ```
/// # use msu::libs::units::msu_extremes;
/// assert_eq!(msu_extremes(&[1, 0, 2, 2, 1], 1), Some((4, 0)));
/// assert_eq!(msu_extremes(&[1, 0, 2, 2, 1], 2), Some((2, 3)));
/// assert_eq!(msu_extremes(&[1, 1, 1], 1), Some((0, 2)));
/// assert_eq!(msu_extremes(&[1, 1, 1], 3), None);
/// ```
pub fn msu_extremes(msus: &[usize], m: usize) -> Option<(usize, usize)> {
    let n = msus.len();
    if !msus.contains(&m) {
        return None;
    }
    if msus.iter().all(|&x| x == m) {
        return Some((0, n - 1));
    }

    let mut start = None;
    let mut end = None;
    for i in 0..n {
        let j = (i + 1) % n;
        if msus[i] == m && msus[j] != m {
            end = Some(i);
        } else if msus[i] != m && msus[j] == m {
            start = Some(j);
        }
    }
    start.zip(end)
}

/// Extents of every non-zero MSU in both genomes, ordered by MSU then genome
pub fn units(table: &BlockTable, records: &[MsuRecord]) -> Result<Vec<UnitRow>, TableError> {
    let (g1, g2) = table.pair()?;
    let index = index_msus(records);

    let mut out = vec![];
    let mut per_genome = vec![];
    for genome in [g1, g2] {
        let rows = table.rows(genome)?;
        let msus = rows
            .iter()
            .map(|r| lookup_msu(&index, genome, &r.node()).map(|(m, _)| m))
            .collect::<Result<Vec<_>, _>>()?;
        per_genome.push((genome, rows, msus));
    }

    let ids: Vec<usize> = per_genome
        .iter()
        .flat_map(|(_, _, msus)| msus.iter().copied())
        .filter(|&m| m != 0)
        .sorted()
        .dedup()
        .collect();

    for m in ids {
        for (genome, rows, msus) in &per_genome {
            let Some((first, last)) = msu_extremes(msus, m) else {
                continue;
            };
            out.push(UnitRow {
                msu: m,
                genome: genome.to_string(),
                n_blocks: msus.iter().filter(|&&x| x == m).count(),
                first,
                last,
                start_position: rows[first].start_position,
                end_position: rows[last].end_position,
            });
        }
    }

    Ok(out)
}
