//! # Nanoduplex Simulate
//!
//! Companion tool to nanoduplex which creates artificial simplex/duplex read
//! pairs, written as a tab-separated file that `nanoduplex map-pairs` reads.
use clap::Parser;
use nanoduplex_core::{Error, simulate_duplex};

/// Main command line parsing struct that gets paths to files to be created.
#[derive(Parser, Debug)]
#[command(author, version,
    about = "Simulate simplex/duplex read pairs. Aimed at developers who wish to test duplex mapping",
    long_about = None)]
struct Cli {
    /// Input JSON file path
    json: String,
    /// Output pairs file path; if pre-existing, the file will be overwritten.
    pairs: String,
}

/// Main function, run the program. All business logic handled by `run`
fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error during execution: {e}");
            std::process::exit(1);
        }
    }
}

/// Simple wrapper around `simulate_duplex::run`.
///
/// # Errors
/// Returns errors from reading the configuration or writing pairs
fn run(cli: &Cli) -> Result<(), Error> {
    let json_str = std::fs::read_to_string(&cli.json)?;
    simulate_duplex::run(&json_str, &cli.pairs)
}
