use clap::Parser;

use crate::config::{ApiConfig, Defaults};

mod cli;
mod config;
mod extract;
mod fetch;
mod output;
mod transform;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let config = ApiConfig::from_env()?;

    // A missing links file aborts before any network traffic.
    let ids = extract::extract_pub_ids(&args.links)?;

    let outcome = fetch::run_batch(&config, &Defaults::default(), &ids);

    output::write_json("ki_json", "articles", &outcome.articles)?;
    if !outcome.failed.is_empty() {
        output::write_json("", "failed", &outcome.failed)?;
    }

    match outcome.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
