use anyhow::Context;
use clap::Parser;
use kafka_test_client::{run, Cli, PublishReport, TestClientConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match execute(cli).await {
        Ok(report) if report.is_complete() => ExitCode::SUCCESS,
        Ok(report) => {
            error!(
                "{} of {} message(s) were not delivered",
                report.failed(),
                report.requested
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Exception producing messages: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<PublishReport> {
    info!("properties = [{}]", cli.properties.display());

    let config = TestClientConfig::load(&cli.properties)
        .with_context(|| format!("loading {}", cli.properties.display()))?;

    let report = run(&config).await.context("creating Kafka producer")?;
    Ok(report)
}
