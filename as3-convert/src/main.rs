use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod compile_cmd;
mod field_table_cmd;
mod inspect_cmd;
mod path_guard;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile(args) => compile_cmd::run_compile(args),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
        Command::FieldTable(args) => field_table_cmd::run_field_table(args),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
