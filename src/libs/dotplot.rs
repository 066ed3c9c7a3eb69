//! Dotplot geometry of two circular genomes.
//!
//! Every pair of occurrences of a shared block becomes a [`Segment`], every
//! occurrence of a private block a [`PrivSegment`]. Each item is decomposed
//! into origin-free pieces, ready to be drawn as straight lines.

use crate::libs::error::{SegmentError, TableError};
use crate::libs::segment::{decompose, decompose_private, PrivSegment, Segment};
use crate::libs::table::{length_of, lookup_msu, strand_str, BlockRow, BlockTable, MsuIndex};
use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Pair(Segment),
    /// Private to genome 1 (drawn along x) or genome 2 (along y)
    Private { seg: PrivSegment, first: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DotItem {
    pub category: String,
    pub block_id: String,
    pub occ1: Option<(bool, usize)>,
    pub occ2: Option<(bool, usize)>,
    pub shape: Shape,
}

/// One straight line of the plot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DotRow {
    pub category: String,
    pub block_id: String,
    pub strand1: String,
    pub occ1: Option<usize>,
    pub strand2: String,
    pub occ2: Option<usize>,
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
}

fn by_block(rows: &[BlockRow]) -> IndexMap<&str, Vec<&BlockRow>> {
    let mut map: IndexMap<&str, Vec<&BlockRow>> = IndexMap::new();
    for row in rows {
        map.entry(row.block_id.as_str()).or_default().push(row);
    }
    map
}

fn pair_segment(a1: &BlockRow, a2: &BlockRow, l1: u64, l2: u64) -> Result<Segment, SegmentError> {
    Segment::new(
        a1.start_position as f64,
        a1.end_position as f64,
        a2.start_position as f64,
        a2.end_position as f64,
        a1.strand == a2.strand,
        l1,
        l2,
    )
}

fn private_items(
    table: &BlockTable,
    lengths: &HashMap<String, u64>,
) -> Result<Vec<DotItem>, TableError> {
    let (g1, g2) = table.pair()?;
    let blocks1 = by_block(table.rows(g1)?);
    let blocks2 = by_block(table.rows(g2)?);

    let mut items = vec![];
    for (genome, own, other, first) in [(g1, &blocks1, &blocks2, true), (g2, &blocks2, &blocks1, false)] {
        let l = length_of(lengths, genome)?;
        for (bid, occs) in own.iter().filter(|(bid, _)| !other.contains_key(*bid)) {
            let category = if occs.len() > 1 {
                "dupl".to_string()
            } else {
                format!("private_{}", genome)
            };
            for row in occs {
                let occ = Some((row.strand, row.occurrence_number));
                items.push(DotItem {
                    category: category.clone(),
                    block_id: bid.to_string(),
                    occ1: if first { occ } else { None },
                    occ2: if first { None } else { occ },
                    shape: Shape::Private {
                        seg: PrivSegment::new(row.start_position, row.end_position, l)?,
                        first,
                    },
                });
            }
        }
    }
    Ok(items)
}

/// Shared blocks labeled `fwd`, `inverted` or `dupl`; private blocks `private_<genome>`
pub fn plain_items(
    table: &BlockTable,
    lengths: &HashMap<String, u64>,
) -> Result<Vec<DotItem>, TableError> {
    let (g1, g2) = table.pair()?;
    let (l1, l2) = (length_of(lengths, g1)?, length_of(lengths, g2)?);
    let blocks1 = by_block(table.rows(g1)?);
    let blocks2 = by_block(table.rows(g2)?);

    let mut items = vec![];
    for (bid, occs1) in &blocks1 {
        let Some(occs2) = blocks2.get(bid) else {
            continue;
        };
        let dupl = occs1.len() > 1 || occs2.len() > 1;
        for (a1, a2) in occs1.iter().cartesian_product(occs2.iter()) {
            let category = if dupl {
                "dupl"
            } else if a1.strand == a2.strand {
                "fwd"
            } else {
                "inverted"
            };
            items.push(DotItem {
                category: category.to_string(),
                block_id: bid.to_string(),
                occ1: Some((a1.strand, a1.occurrence_number)),
                occ2: Some((a2.strand, a2.occurrence_number)),
                shape: Shape::Pair(pair_segment(a1, a2, l1, l2)?),
            });
        }
    }

    items.extend(private_items(table, lengths)?);
    Ok(items)
}

/// Pairs carrying the same MSU (and, inside a unit, the same signature), labeled `msu_<id>`
pub fn msu_items(
    table: &BlockTable,
    lengths: &HashMap<String, u64>,
    index: &MsuIndex,
) -> Result<Vec<DotItem>, TableError> {
    let (g1, g2) = table.pair()?;
    let (l1, l2) = (length_of(lengths, g1)?, length_of(lengths, g2)?);
    let rows2 = table.rows(g2)?;

    let mut items = vec![];
    for a1 in table.rows(g1)? {
        let (msu1, sig1) = lookup_msu(index, g1, &a1.node())?;
        for a2 in rows2.iter().filter(|a2| a2.block_id == a1.block_id) {
            let (msu2, sig2) = lookup_msu(index, g2, &a2.node())?;
            if msu1 != msu2 || (msu1 != 0 && sig1 != sig2) {
                continue;
            }
            items.push(DotItem {
                category: format!("msu_{}", msu1),
                block_id: a1.block_id.clone(),
                occ1: Some((a1.strand, a1.occurrence_number)),
                occ2: Some((a2.strand, a2.occurrence_number)),
                shape: Shape::Pair(pair_segment(a1, a2, l1, l2)?),
            });
        }
    }

    items.extend(private_items(table, lengths)?);
    Ok(items)
}

fn occ_fields(occ: Option<(bool, usize)>) -> (String, Option<usize>) {
    match occ {
        Some((strand, n)) => (strand_str(strand).to_string(), Some(n)),
        None => (String::new(), None),
    }
}

fn item_rows(item: &DotItem) -> Result<Vec<DotRow>, SegmentError> {
    let (strand1, occ1) = occ_fields(item.occ1);
    let (strand2, occ2) = occ_fields(item.occ2);
    let row = |x: (f64, f64), y: (f64, f64)| DotRow {
        category: item.category.clone(),
        block_id: item.block_id.clone(),
        strand1: strand1.clone(),
        occ1,
        strand2: strand2.clone(),
        occ2,
        x_start: x.0,
        x_end: x.1,
        y_start: y.0,
        y_end: y.1,
    };

    let rows = match &item.shape {
        Shape::Pair(seg) => decompose(seg)?
            .iter()
            .map(|p| row(p.x(), p.y()))
            .collect(),
        Shape::Private { seg, first } => decompose_private(seg)?
            .iter()
            .map(|p| {
                let x = (p.s as f64, p.e as f64);
                if *first {
                    row(x, (0.0, 0.0))
                } else {
                    row((0.0, 0.0), x)
                }
            })
            .collect(),
    };
    Ok(rows)
}

/// Decomposes all items; rows keep the order of `items`
pub fn render(items: &[DotItem]) -> Result<Vec<DotRow>, SegmentError> {
    let nested: Vec<Vec<DotRow>> = items.par_iter().map(item_rows).collect::<Result<_, _>>()?;
    Ok(nested.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKS: &str = "\
genome,block_id,strand,occurrence_number,start_position,end_position
gA,A,+,1,90,20
gA,B,+,1,20,50
gA,R,+,1,50,60
gA,C,+,1,60,75
gA,P,+,1,75,90
gB,A,+,1,0,30
gB,B,+,1,30,60
gB,R,+,1,60,70
gB,R,+,2,70,80
gB,C,-,1,80,90
gB,Q,+,1,90,0
";

    fn lengths() -> HashMap<String, u64> {
        [("gA".to_string(), 100), ("gB".to_string(), 100)]
            .into_iter()
            .collect()
    }

    #[test]
    fn plain_categories() {
        let table = BlockTable::read(BLOCKS.as_bytes()).unwrap();
        let items = plain_items(&table, &lengths()).unwrap();
        let cats: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i.category.as_str(), i.block_id.as_str()))
            .collect();
        assert_eq!(
            cats,
            vec![
                ("fwd", "A"),
                ("fwd", "B"),
                ("dupl", "R"),
                ("dupl", "R"),
                ("inverted", "C"),
                ("private_gA", "P"),
                ("private_gB", "Q"),
            ]
        );

        let rows = render(&items).unwrap();
        // A wraps the origin of gA
        assert_eq!(rows[0].x_start, 90.0);
        assert_eq!(rows[0].x_end, 100.0);
        assert_eq!(rows[0].y_start, 0.0);
        assert_eq!(rows[0].y_end, 10.0);
        assert_eq!(rows[1].x_start, 0.0);
        assert_eq!(rows[1].x_end, 20.0);
        assert_eq!(rows[1].y_start, 10.0);
        assert_eq!(rows[1].y_end, 30.0);
        assert_eq!((rows[4].y_start, rows[4].y_end), (70.0, 80.0));
        assert_eq!(rows[4].occ2, Some(2));
        // C is drawn descending
        assert_eq!((rows[5].x_start, rows[5].x_end), (60.0, 75.0));
        assert_eq!((rows[5].y_start, rows[5].y_end), (90.0, 80.0));
        assert_eq!(rows[5].strand2, "-");
        // Q ends at the origin of gB
        let q = rows.last().unwrap();
        assert_eq!((q.x_start, q.x_end), (0.0, 0.0));
        assert_eq!((q.y_start, q.y_end), (90.0, 100.0));
        assert_eq!(q.occ1, None);
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn msu_mode() {
        let table = BlockTable::read(BLOCKS.as_bytes()).unwrap();
        let mut gluer = table.gluer().unwrap();
        let seeds = gluer.core_seeds();
        gluer.run(&seeds).unwrap();
        let records = gluer.finalize();
        let index = crate::libs::table::index_msus(&records);

        let items = msu_items(&table, &lengths(), &index).unwrap();
        let cats: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i.category.as_str(), i.block_id.as_str()))
            .collect();
        // R pairs with its glued copy only
        assert_eq!(
            cats,
            vec![
                ("msu_1", "A"),
                ("msu_1", "B"),
                ("msu_1", "R"),
                ("msu_2", "C"),
                ("private_gA", "P"),
                ("private_gB", "Q"),
            ]
        );
        assert_eq!(items[2].occ2, Some((true, 1)));
    }

    #[test]
    fn full_turn_block() {
        let text = "\
genome,block_id,strand,occurrence_number,start_position,end_position
gA,A,+,1,50,50
gB,A,+,1,0,0
";
        let table = BlockTable::read(text.as_bytes()).unwrap();
        let rows = render(&plain_items(&table, &lengths()).unwrap()).unwrap();
        let lines: Vec<(f64, f64, f64, f64)> = rows
            .iter()
            .map(|r| (r.x_start, r.x_end, r.y_start, r.y_end))
            .collect();
        assert_eq!(
            lines,
            vec![(50.0, 100.0, 0.0, 50.0), (0.0, 50.0, 50.0, 100.0)]
        );
    }

    #[test]
    fn needs_two_genomes_and_lengths() {
        let table = BlockTable::read(BLOCKS.as_bytes()).unwrap();
        let mut short = lengths();
        short.remove("gB");
        assert!(matches!(
            plain_items(&table, &short),
            Err(TableError::MissingLength(_))
        ));
    }
}
