//! Tables exchanged with the rest of the pipeline.
//!
//! * block positions: `genome,block_id,strand,occurrence_number,start_position,end_position`
//! * genome lengths: `id,length`
//! * MSU labels: `block_id,strand,occurrence_number,msu,signature,genome`

use crate::libs::error::TableError;
use crate::libs::glue::{Gluer, MsuRecord};
use crate::libs::path::{Node, Path};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Strand as `+`/`-`; also reads `true`/`false` and `1`/`0`
pub mod strand {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(strand: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(super::strand_str(*strand))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_strand(&s).map_err(de::Error::custom)
    }
}

pub fn strand_str(strand: bool) -> &'static str {
    if strand {
        "+"
    } else {
        "-"
    }
}

/// ```
/// # use msu::libs::table::parse_strand;
/// assert!(parse_strand("+").unwrap());
/// assert!(parse_strand("True").unwrap());
/// assert!(!parse_strand("0").unwrap());
/// assert!(parse_strand("x").is_err());
/// ```
pub fn parse_strand(s: &str) -> Result<bool, TableError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "+" | "true" | "1" => Ok(true),
        "-" | "false" | "0" => Ok(false),
        _ => Err(TableError::InvalidStrand(s.to_string())),
    }
}

//----------------------------
// Block positions
//----------------------------
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRow {
    pub genome: String,
    pub block_id: String,
    #[serde(with = "strand")]
    pub strand: bool,
    pub occurrence_number: usize,
    pub start_position: u64,
    pub end_position: u64,
}

impl BlockRow {
    pub fn node(&self) -> Node {
        Node::new(&self.block_id, self.strand, self.occurrence_number)
    }

    /// Length on a circular genome of length `l`; a block ending where it starts covers all of it
    pub fn span(&self, l: u64) -> u64 {
        let d = (self.end_position % l + l - self.start_position % l) % l;
        if d == 0 {
            l
        } else {
            d
        }
    }
}

/// Block paths of all genomes, in first-appearance order
#[derive(Clone, Debug, Default)]
pub struct BlockTable {
    paths: IndexMap<String, Vec<BlockRow>>,
}

impl BlockTable {
    pub fn from_rows(rows: Vec<BlockRow>) -> Self {
        let mut paths: IndexMap<String, Vec<BlockRow>> = IndexMap::new();
        for row in rows {
            paths.entry(row.genome.clone()).or_default().push(row);
        }
        Self { paths }
    }

    pub fn read<R: Read>(rdr: R) -> Result<Self, TableError> {
        let mut csv_rdr = csv::Reader::from_reader(rdr);
        let rows = csv_rdr
            .deserialize()
            .collect::<Result<Vec<BlockRow>, csv::Error>>()?;
        Ok(Self::from_rows(rows))
    }

    pub fn genomes(&self) -> Vec<&str> {
        self.paths.keys().map(|k| k.as_str()).collect()
    }

    pub fn rows(&self, genome: &str) -> Result<&[BlockRow], TableError> {
        self.paths
            .get(genome)
            .map(|v| v.as_slice())
            .ok_or_else(|| TableError::UnknownGenome(genome.to_string()))
    }

    /// The two genomes under comparison
    pub fn pair(&self) -> Result<(&str, &str), TableError> {
        if self.paths.len() != 2 {
            return Err(TableError::GenomeCount(self.paths.len()));
        }
        let genomes = self.genomes();
        Ok((genomes[0], genomes[1]))
    }

    pub fn path(&self, genome: &str) -> Result<Path, TableError> {
        let nodes = self.rows(genome)?.iter().map(|r| r.node()).collect();
        Ok(Path::new(nodes)?)
    }

    pub fn gluer(&self) -> Result<Gluer, TableError> {
        let (g1, g2) = self.pair()?;
        Ok(Gluer::new(g1, self.path(g1)?, g2, self.path(g2)?))
    }
}

//----------------------------
// Genome lengths
//----------------------------
#[derive(Debug, Deserialize)]
struct LengthRow {
    id: String,
    length: u64,
}

pub fn read_lengths<R: Read>(rdr: R) -> Result<HashMap<String, u64>, TableError> {
    let mut csv_rdr = csv::Reader::from_reader(rdr);
    let mut lengths = HashMap::new();
    for result in csv_rdr.deserialize() {
        let row: LengthRow = result?;
        if row.length == 0 {
            return Err(TableError::ZeroLength(row.id));
        }
        lengths.insert(row.id, row.length);
    }
    Ok(lengths)
}

/// A positive genome length
pub fn length_of(lengths: &HashMap<String, u64>, genome: &str) -> Result<u64, TableError> {
    match lengths.get(genome) {
        None => Err(TableError::MissingLength(genome.to_string())),
        Some(0) => Err(TableError::ZeroLength(genome.to_string())),
        Some(&l) => Ok(l),
    }
}

//----------------------------
// MSU labels
//----------------------------
pub fn read_msus<R: Read>(rdr: R) -> Result<Vec<MsuRecord>, TableError> {
    let mut csv_rdr = csv::Reader::from_reader(rdr);
    let records = csv_rdr
        .deserialize()
        .collect::<Result<Vec<MsuRecord>, csv::Error>>()?;
    Ok(records)
}

/// `(genome, node) -> (msu, signature)`
pub type MsuIndex = HashMap<(String, Node), (usize, u64)>;

pub fn index_msus(records: &[MsuRecord]) -> MsuIndex {
    records
        .iter()
        .map(|r| {
            let node = Node::new(&r.block_id, r.strand, r.occurrence_number);
            ((r.genome.clone(), node), (r.msu, r.signature))
        })
        .collect()
}

pub fn lookup_msu(index: &MsuIndex, genome: &str, node: &Node) -> Result<(usize, u64), TableError> {
    index
        .get(&(genome.to_string(), node.clone()))
        .copied()
        .ok_or_else(|| TableError::MissingRecord(format!("{} {}", genome, node)))
}

//----------------------------
// Output
//----------------------------
pub fn write_csv<W: Write, T: Serialize>(wtr: W, rows: &[T]) -> Result<(), TableError> {
    write_delimited(wtr, rows, b',')
}

pub fn write_tsv<W: Write, T: Serialize>(wtr: W, rows: &[T]) -> Result<(), TableError> {
    write_delimited(wtr, rows, b'\t')
}

fn write_delimited<W: Write, T: Serialize>(wtr: W, rows: &[T], delimiter: u8) -> Result<(), TableError> {
    let mut csv_wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(wtr);
    for row in rows {
        csv_wtr.serialize(row)?;
    }
    csv_wtr.flush()?;
    Ok(())
}
