extern crate clap;
use clap::*;

mod cmd_msu;

fn main() -> anyhow::Result<()> {
    let app = Command::new("msu")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`msu` - Minimal Synteny Units of circular genomes")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Raise the log level: -v info, -vv debug, -vvv trace"),
        )
        .subcommand(cmd_msu::glue::make_subcommand())
        .subcommand(cmd_msu::check::make_subcommand())
        .subcommand(cmd_msu::stats::make_subcommand())
        .subcommand(cmd_msu::dotplot::make_subcommand())
        .subcommand(cmd_msu::units::make_subcommand())
        .after_help(
            r###"Subcommands:

* Synteny:
    * glue  - Partition shared blocks of two genomes into MSUs
    * check - Validate the signatures of an MSU table
    * units - Extent of each MSU along both genomes

* Blocks:
    * stats   - Occurrence statistics per block
    * dotplot - Origin-free line segments of a dotplot

Logging goes to stderr. RUST_LOG overrides the default level (warn).

"###,
        );

    let matches = app.get_matches();
    init_logger(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("glue", sub_matches)) => cmd_msu::glue::execute(sub_matches),
        Some(("check", sub_matches)) => cmd_msu::check::execute(sub_matches),
        Some(("stats", sub_matches)) => cmd_msu::stats::execute(sub_matches),
        Some(("dotplot", sub_matches)) => cmd_msu::dotplot::execute(sub_matches),
        Some(("units", sub_matches)) => cmd_msu::units::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}

fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}
