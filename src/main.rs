use anyhow::Result;
use clap::Parser;

use linebar_cli::settings::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = linebar_cli::cli::Cli::parse();
    init_logger()?;
    linebar_cli::run(cli).await?;
    Ok(())
}
