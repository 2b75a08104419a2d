use std::process;

use fee_ledger::cli;

fn main() {
    fee_ledger::init();

    if let Err(err) = cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
