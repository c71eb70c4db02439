use clap::Parser;

use rent_vs_own::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    cli::run(Cli::parse()).await
}
