use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use spendlog::config::LedgerPaths;
use spendlog::storage::Store;

/// Interactive personal expense ledger
#[derive(Parser, Debug)]
#[command(name = "spendlog", version, about)]
struct Args {
    /// Directory holding the data file, backup slot and audit log
    #[arg(long, env = "SPENDLOG_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let paths = match args.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let store = Store::new(paths);

    let stdin = io::stdin();
    let stdout = io::stdout();
    spendlog::cli::run(&store, BufReader::new(stdin.lock()), stdout.lock())?;

    Ok(())
}
