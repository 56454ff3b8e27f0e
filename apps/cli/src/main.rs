//! routemap CLI: site map and robots.txt generator.
//!
//! Combines the static route catalog with content identifiers from the
//! content API and the bundled fallback resource, then writes
//! `sitemap.xml` and `robots.txt` into the site's public directory.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
