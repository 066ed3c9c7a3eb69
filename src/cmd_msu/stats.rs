use anyhow::Context;
use clap::*;
use msu::libs::stats::block_stats;
use msu::libs::table::{read_lengths, write_csv, BlockTable};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("stats")
        .about("Occurrence statistics per block")
        .after_help(
            r###"
For each block:
* count     - occurrences over all genomes
* n_genomes - genomes containing the block
* core      - exactly one occurrence in every genome
* duplicated - more than one occurrence in some genome
* category  - core, duplicated or accessory
* len       - mean length of an occurrence

Rows are sorted with core blocks first, then by count and length.

Examples:
1. Block statistics:
   msu stats blocks.csv lengths.csv

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Block positions"),
        )
        .arg(
            Arg::new("lengths")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Genome lengths, a CSV with columns id,length"),
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

    let stats = block_stats(&table, &lengths)?;
    write_csv(writer, &stats)?;

    Ok(())
}
