//! Subcommand modules for the `msu` binary.

pub mod check;
pub mod dotplot;
pub mod glue;
pub mod stats;
pub mod units;
