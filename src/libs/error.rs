use thiserror::Error;

/// Failures of the Path Model and the Synteny Gluer.
///
/// All of them abort the current run; none is transient.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlueError {
    /// The two nodes of a seed pair name different blocks
    #[error("Invalid seed: {0} and {1} do not share a block")]
    InvalidSeed(String, String),
    /// A seed pair (or a node reached from it) is already labeled inconsistently
    #[error("Inconsistent label: {node1} carries MSU {msu1} but {node2} carries MSU {msu2}")]
    InconsistentLabel {
        node1: String,
        msu1: usize,
        node2: String,
        msu2: usize,
    },
    /// The 2:1 law between labeled nodes and signatures does not hold
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),
    #[error("Node not found in path: {0}")]
    UnknownNode(String),
    #[error("Duplicate node in path: {0}")]
    DuplicateNode(String),
    #[error("Empty path")]
    EmptyPath,
}

/// Failures of the Circular Segment Decomposer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SegmentError {
    /// Interpolation over a zero span
    #[error("Degenerate segment: zero span on axis {axis} ({segment})")]
    DegenerateSegment { axis: u8, segment: String },
    #[error("Segment does not cross the origin of axis {axis} ({segment})")]
    NoRunover { axis: u8, segment: String },
    /// A split piece crossed an origin that was already fixed
    #[error("Segment decomposition too deep ({depth} splits): {segment}")]
    RecursionDepth { depth: usize, segment: String },
    #[error("Axis length must be positive")]
    ZeroLength,
}

/// Failures while reading or interpreting input tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid strand: {0}")]
    InvalidStrand(String),
    #[error("Expected exactly two genomes, found {0}")]
    GenomeCount(usize),
    #[error("Unknown genome: {0}")]
    UnknownGenome(String),
    #[error("No length for genome: {0}")]
    MissingLength(String),
    #[error("Zero length for genome: {0}")]
    ZeroLength(String),
    #[error("No MSU record for: {0}")]
    MissingRecord(String),
    #[error("Segment Error: {0}")]
    Segment(#[from] SegmentError),
    #[error("Glue Error: {0}")]
    Glue(#[from] GlueError),
}
