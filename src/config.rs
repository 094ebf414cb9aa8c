//! Command-line and environment configuration for the ledger binary.

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::blockchain::LeadingZeroBytes;

/// Interactive tamper-evident ledger with proof of work.
#[derive(Parser, Debug, Clone)]
#[command(name = "hash_ledger", version, about)]
pub struct Config {
    /// Number of leading zero bytes a block hash needs to be accepted.
    ///
    /// Every extra byte makes mining roughly 256 times slower.
    #[arg(long, short = 'd', env = "LEDGER_DIFFICULTY", default_value_t = 3)]
    pub difficulty: usize,

    /// Seed for the mining nonce generator. Random when omitted.
    #[arg(long, env = "LEDGER_SEED")]
    pub seed: Option<u64>,

    /// How `blocks` and `transactions` are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Default log filter, overridden by RUST_LOG.
    #[arg(long, env = "LEDGER_LOG", default_value = "warn")]
    pub log_level: String,
}

/// Rendering used for listings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl Config {
    /// The validator every block of the chain is held to.
    pub fn validator(&self) -> LeadingZeroBytes {
        LeadingZeroBytes(self.difficulty)
    }

    /// The nonce generator used for mining.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rand::Rng;

    #[test]
    fn verify_cli_structure() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let config = Config::parse_from([
            "hash_ledger",
            "--difficulty",
            "1",
            "--seed",
            "42",
            "--format",
            "json",
            "--log-level",
            "debug",
        ]);

        assert_eq!(config.validator(), LeadingZeroBytes(1));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = Config::parse_from(["hash_ledger", "--seed", "7"]);

        let first: i64 = config.rng().gen();
        let second: i64 = config.rng().gen();
        assert_eq!(first, second);
    }
}
