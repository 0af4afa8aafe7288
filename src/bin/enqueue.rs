//! enqueue: insert one or more copies of a message into the queue.

use std::process::ExitCode;

use dbqueue::cli::{self, ENQUEUE_HELP, INVALID_OPTIONS, Invocation};
use dbqueue::config::Config;
use dbqueue::engine::{AppContext, EnqueueOptions, run_enqueue};
use dbqueue::telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let options = match cli::parse_enqueue(std::env::args().skip(1)) {
        Ok(Invocation::Help) => {
            println!("{ENQUEUE_HELP}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run(options)) => options,
        Err(e) => {
            eprintln!("Invalid options");
            eprintln!("{e}");
            println!("{ENQUEUE_HELP}");
            return ExitCode::from(INVALID_OPTIONS);
        }
    };

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: EnqueueOptions) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig::for_service(&config, "dbqueue-enqueue"))?;
    tracing::debug!(otlp = guard.is_exporting(), "telemetry initialized");

    let span = tracing::info_span!("enqueue", queue = %config.queue_name);
    let ctx = AppContext::connect(&config, span).await?;

    run_enqueue(&ctx, &options).await?;
    Ok(())
}
