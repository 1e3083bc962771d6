use clap::Parser;
use quotewatch::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
