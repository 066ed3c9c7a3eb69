//! Minimal Synteny Units of two circular genomes.
//!
//! # Core Components
//!
//! * [`path`] - Genomes as cyclic paths of oriented block occurrences.
//! * [`glue`] - The Synteny Gluer, partitioning shared blocks into MSUs.
//! * [`segment`] - Splitting of block-to-block segments at the origins of both axes.
//! * [`table`] - Block positions, genome lengths and MSU labels as CSV.
//! * [`stats`] - Per-block occurrence statistics.
//! * [`dotplot`] - Line segments of a dotplot, plain or colored by MSU.
//! * [`units`] - Extent of each MSU along both genomes.
//!
//! # Algorithm Overview
//!
//! 1. **Input**: block positions of two genomes.
//! 2. **Seeds**: blocks occurring exactly once in each genome.
//! 3. **Gluing**: each seed is extended in both directions while the genomes agree.
//! 4. **Output**: one MSU id and one signature per block occurrence.

pub mod dotplot;
pub mod error;
pub mod glue;
pub mod io;
pub mod path;
pub mod segment;
pub mod stats;
pub mod table;
pub mod units;

pub use error::{GlueError, SegmentError, TableError};
pub use glue::{check_signatures, Gluer, MsuRecord};
pub use path::{Edge, Node, Path};
pub use segment::{decompose, decompose_private, PrivSegment, Segment};
