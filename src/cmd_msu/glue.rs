use anyhow::Context;
use clap::*;
use log::info;
use msu::libs::glue::check_signatures;
use msu::libs::table::{write_csv, BlockTable};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("glue")
        .about("Partitions shared blocks of two genomes into Minimal Synteny Units")
        .after_help(
            r###"
This command reads the block positions of two circular genomes and labels every block
occurrence with the Minimal Synteny Unit (MSU) it belongs to.

Input is a CSV with the header
    genome,block_id,strand,occurrence_number,start_position,end_position
Rows of one genome are in path order. Exactly two genomes are required.

Output is a CSV with the header
    block_id,strand,occurrence_number,msu,signature,genome
MSU ids are 1..=k; 0 means the occurrence is in no unit. The two occurrences glued
together share a signature.

Notes:
* Seeds are the blocks occurring exactly once in each genome
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'

Examples:
1. Glue two genomes:
   msu glue blocks.csv -o msu.csv

2. Glue and validate the signatures before writing:
   msu glue blocks.csv --check

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
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Validate the signatures of the result"),
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
    let writer = msu::writer(args.get_one::<String>("outfile").unwrap())?;

    let table = BlockTable::read(msu::reader(infile)?)
        .with_context(|| format!("failed to read block positions from {}", infile))?;
    let mut gluer = table.gluer()?;
    let (name1, name2) = gluer.names();
    info!(
        "Gluing {} ({} blocks) and {} ({} blocks)",
        name1,
        gluer.path1().len(),
        name2,
        gluer.path2().len()
    );

    let seeds = gluer.core_seeds();
    gluer.run(&seeds)?;
    let records = gluer.finalize();

    if args.get_flag("check") {
        let n = check_signatures(&records)?;
        info!("Signatures consistent over {} MSUs", n);
    }

    write_csv(writer, &records)?;

    Ok(())
}
