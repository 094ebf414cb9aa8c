use anyhow::Result;
use clap::Parser;
use log::info;

use std::io;

use hash_ledger::blockchain::Blockchain;
use hash_ledger::cli::Session;
use hash_ledger::config::Config;

fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.as_str()));

    let mut rng = config.rng();

    info!(
        "Mining genesis block with {} leading zero byte(s)",
        config.difficulty
    );
    let chain = Blockchain::with_rng(config.validator(), &mut rng);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(chain, rng, config.format, stdin.lock(), stdout.lock());

    session.run()
}
