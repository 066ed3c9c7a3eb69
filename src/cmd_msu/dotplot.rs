use anyhow::Context;
use clap::*;
use log::info;
use msu::libs::dotplot::{msu_items, plain_items, render};
use msu::libs::table::{index_msus, read_lengths, read_msus, write_tsv, BlockTable};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("dotplot")
        .about("Line segments of a dotplot of two circular genomes")
        .after_help(
            r###"
Each pair of occurrences of a shared block is a segment from (start1, start2) to
(end1, end2). A block crossing the origin of either genome is split at the origin,
so every output row is a straight line inside [0, L1] x [0, L2]. Inverted pairs are
drawn descending.

Categories:
* plain mode: fwd, inverted, dupl (block repeated in a genome)
* --msu mode: msu_<id>, only for pairs glued together (or both unlabeled)
* private_<genome>: blocks present in one genome, drawn on its axis

Examples:
1. Plain dotplot:
   msu dotplot blocks.csv lengths.csv -o dotplot.tsv

2. Colored by MSU:
   msu glue blocks.csv -o msu.csv
   msu dotplot blocks.csv lengths.csv --msu msu.csv

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Block positions of two genomes"),
        )
        .arg(
            Arg::new("lengths")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Genome lengths, a CSV with columns id,length"),
        )
        .arg(
            Arg::new("msu")
                .long("msu")
                .num_args(1)
                .help("MSU table; label segments by MSU"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let len_file = args.get_one::<String>("lengths").unwrap();
    let writer = msu::writer(args.get_one::<String>("outfile").unwrap())?;

    let table = BlockTable::read(msu::reader(infile)?)
        .with_context(|| format!("failed to read block positions from {}", infile))?;
    let lengths = read_lengths(msu::reader(len_file)?)
        .with_context(|| format!("failed to read genome lengths from {}", len_file))?;

    let items = match args.get_one::<String>("msu") {
        Some(msu_file) => {
            let records = read_msus(msu::reader(msu_file)?)
                .with_context(|| format!("failed to read MSU table from {}", msu_file))?;
            msu_items(&table, &lengths, &index_msus(&records))?
        }
        None => plain_items(&table, &lengths)?,
    };

    let rows = render(&items)?;
    info!("{} items, {} segments", items.len(), rows.len());
    write_tsv(writer, &rows)?;

    Ok(())
}
