use std::process;

use clap::Parser;
use log::LevelFilter;
use textbook_rsa::app::{self, Args};

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // RUST_LOG, when set, overrides the -v level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = app::run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
