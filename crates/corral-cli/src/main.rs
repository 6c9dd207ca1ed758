mod cli;

use crate::cli::{Command, LogFormatArg, StrategyArg, CLI};
use anyhow::Context;
use clap::Parser;
use corral_balancer::{Dispatcher, DispatcherSettings, Strategy};
use corral_keystore::{KeyStore, KeyStoreSettings};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct Shortened<'a> {
    value: &'a str,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct Picked<'a> {
    pick: usize,
    instance: &'a str,
}

fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    match config.command {
        Command::Shorten {
            capacity,
            token_length,
            base_url,
            values,
        } => shorten(capacity, token_length, base_url, config.seed, &values),
        Command::Dispatch {
            capacity,
            strategy,
            instances,
            picks,
        } => dispatch(capacity, strategy, config.seed, instances, picks),
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => subscriber.init(),
        LogFormatArg::Json => subscriber.json().init(),
    }
}

fn shorten(
    capacity: usize,
    token_length: usize,
    base_url: Option<String>,
    seed: Option<u64>,
    values: &[String],
) -> anyhow::Result<()> {
    let settings = KeyStoreSettings {
        capacity,
        token_length,
        base_url,
        seed,
        ..KeyStoreSettings::default()
    };
    info!(capacity, token_length, values = values.len(), "starting key store");
    let store = KeyStore::new(settings);

    for value in values {
        let key = store
            .shorten(value)
            .with_context(|| format!("failed to shorten {value}"))?;
        let line = Shortened {
            value,
            key: key.as_str(),
            url: store.base_url().map(|base_url| key.to_url(base_url)),
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}

fn dispatch(
    capacity: usize,
    strategy: StrategyArg,
    seed: Option<u64>,
    instances: Vec<String>,
    picks: usize,
) -> anyhow::Result<()> {
    let settings = DispatcherSettings {
        capacity,
        strategy: Strategy::from(strategy),
        seed,
    };
    info!(capacity, strategy = %strategy, instances = instances.len(), "starting dispatcher");
    let dispatcher = Dispatcher::with_instances(settings, instances)
        .context("failed to register instances")?;

    for pick in 1..=picks {
        let instance = dispatcher.next()?;
        let line = Picked {
            pick,
            instance: &instance,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}
