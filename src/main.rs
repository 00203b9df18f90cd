use anyhow::Result;
use clap::Parser;
use kpi_engine::{cli, launch, observability};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();
    let config = args.into_config()?;

    observability::init(config.verbose)?;

    let trace = launch(&config).await?;

    if trace.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
