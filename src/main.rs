//! Command line entry point for nanoduplex
use clap::Parser;
use nanoduplex_core::commands;
use std::io::{self, BufWriter};

fn main() {
    env_logger::init();
    let cli = commands::Cli::parse();

    let handle = BufWriter::new(io::stdout().lock());
    if let Err(e) = commands::run(cli, handle) {
        eprintln!("Error during execution: {e}");
        std::process::exit(1);
    }
}
