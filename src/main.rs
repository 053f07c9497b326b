mod cli;
mod config;
mod error;
mod logging;
mod model;
mod probe;
mod storage;
mod target;

use std::process;

use clap::Parser;

use cli::{Cli, Outcome};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli::run(cli) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::ProbeFailed) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
