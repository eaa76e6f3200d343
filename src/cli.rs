use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Text file with one article URL per line; identifiers are taken from
    /// the `pii/` path segment of each link.
    #[arg(value_name = "LINKS", default_value = "links.txt")]
    pub links: PathBuf,
}
