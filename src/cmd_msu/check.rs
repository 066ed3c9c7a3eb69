use anyhow::Context;
use clap::*;
use log::info;
use msu::libs::glue::check_signatures;
use msu::libs::table::read_msus;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("check")
        .about("Validates the signatures of an MSU table")
        .after_help(
            r###"
Every labeled occurrence shares its signature with exactly one occurrence of the
other genome, carrying the same MSU id. So the number of labeled rows is twice the
number of distinct signatures.

The command exits with an error on the first violation. On success it writes the
number of labeled rows and of MSUs.

Examples:
1. Check a table written by `msu glue`:
   msu check msu.csv

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
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
    let mut writer = msu::writer(args.get_one::<String>("outfile").unwrap())?;

    let records = read_msus(msu::reader(infile)?)
        .with_context(|| format!("failed to read MSU table from {}", infile))?;
    let n_msus = check_signatures(&records)
        .with_context(|| format!("inconsistent MSU table {}", infile))?;

    let n_labeled = records.iter().filter(|r| r.msu != 0).count();
    info!("{} rows, {} labeled", records.len(), n_labeled);
    writer.write_fmt(format_args!("labeled\t{}\nmsus\t{}\n", n_labeled, n_msus))?;

    Ok(())
}
