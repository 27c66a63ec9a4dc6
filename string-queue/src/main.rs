use std::{
    env,
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use log::info;
use string_queue::{
    harness::{Config, Harness, DEFAULT_LENGTH},
    order::Order,
};

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let length = match args.length {
        Some(length) => length,
        None => match env::var("QTEST_LENGTH") {
            Ok(length) => length.parse().context("Failed to parse QTEST_LENGTH")?,
            Err(_) => DEFAULT_LENGTH,
        },
    };
    let config = Config {
        length,
        limit: args.limit,
        order: args.order,
    };

    let input: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut stdout = io::stdout().lock();
    let failures = Harness::new(config).run(input, &mut stdout)?;
    info!("Finished with {failures} failed commands");

    if failures == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Drives a string queue from a script of commands (see `help`).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run; commands are read from stdin when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Capacity of the removal buffer, falls back to QTEST_LENGTH
    #[arg(short, long)]
    length: Option<usize>,
    /// Maximum number of elements a new queue may hold
    #[arg(long)]
    limit: Option<usize>,
    #[arg(short, long, value_enum, default_value = "bytewise")]
    order: Order,
}
