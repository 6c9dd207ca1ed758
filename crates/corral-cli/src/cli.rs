use clap::{Parser, Subcommand, ValueEnum};
use corral_balancer::{Strategy, DEFAULT_MAX_INSTANCES};
use corral_generator::DEFAULT_TOKEN_LENGTH;
use corral_keystore::DEFAULT_MAX_KEYS;
use std::fmt::{Display, Formatter};

pub const CAPACITY_ENV: &str = "CORRAL_CAPACITY";
pub const SEED_ENV: &str = "CORRAL_SEED";
pub const TOKEN_LENGTH_ENV: &str = "CORRAL_TOKEN_LENGTH";
pub const BASE_URL_ENV: &str = "CORRAL_BASE_URL";
pub const STRATEGY_ENV: &str = "CORRAL_STRATEGY";
pub const LOG_FORMAT_ENV: &str = "CORRAL_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    #[value(name = "round-robin")]
    RoundRobin,
    #[value(name = "random")]
    Random,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::RoundRobin => Strategy::RoundRobin,
            StrategyArg::Random => Strategy::Random,
        }
    }
}

impl Display for StrategyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyArg::RoundRobin => write!(f, "round-robin"),
            StrategyArg::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "corral", about = "Bounded key registries: short keys and instance dispatch")]
pub struct CLI {
    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text,
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Seed for the random source; omit for OS entropy.
    #[arg(long, env = SEED_ENV, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten each value and print its key.
    Shorten {
        #[arg(long, env = CAPACITY_ENV, default_value_t = DEFAULT_MAX_KEYS)]
        capacity: usize,

        #[arg(long, env = TOKEN_LENGTH_ENV, default_value_t = DEFAULT_TOKEN_LENGTH)]
        token_length: usize,

        #[arg(long, env = BASE_URL_ENV)]
        base_url: Option<String>,

        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Register instances and print the ones picked for each request.
    Dispatch {
        #[arg(long, env = CAPACITY_ENV, default_value_t = DEFAULT_MAX_INSTANCES)]
        capacity: usize,

        #[arg(
            long,
            env = STRATEGY_ENV,
            value_enum,
            default_value_t = StrategyArg::RoundRobin
        )]
        strategy: StrategyArg,

        #[arg(long = "instance", required = true)]
        instances: Vec<String>,

        #[arg(long, default_value_t = 1)]
        picks: usize,
    },
}
