use anyhow::Context;
use clap::*;
use msu::libs::table::{read_msus, write_tsv, BlockTable};
use msu::libs::units::units;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("units")
        .about("Extent of each MSU along both genomes")
        .after_help(
            r###"
For every MSU and genome, writes the path indices of its first and last blocks,
the number of blocks, and the positions where the unit starts and ends.

An MSU crossing the origin of a genome has first > last.

Examples:
1. MSU extents:
   msu glue blocks.csv -o msu.csv
   msu units blocks.csv msu.csv

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
            Arg::new("msu")
                .required(true)
                .num_args(1)
                .index(2)
                .help("MSU table"),
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
    let msu_file = args.get_one::<String>("msu").unwrap();
    let writer = msu::writer(args.get_one::<String>("outfile").unwrap())?;

    let table = BlockTable::read(msu::reader(infile)?)
        .with_context(|| format!("failed to read block positions from {}", infile))?;
    let records = read_msus(msu::reader(msu_file)?)
        .with_context(|| format!("failed to read MSU table from {}", msu_file))?;

    let rows = units(&table, &records)?;
    write_tsv(writer, &rows)?;

    Ok(())
}
