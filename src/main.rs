use anyhow::Context;
use clap::Parser;
use dss_tidy::cli::args::{Args, Commands};
use dss_tidy::cli::commands;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    commands::setup_logging(&args);

    let command = match &args.command {
        Commands::Catalog(_) => "catalog",
        Commands::Read(_) => "read",
        Commands::Write(_) => "write",
    };
    commands::run(args).with_context(|| format!("{} command failed", command))
}
