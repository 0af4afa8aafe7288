//! dequeue: drain messages from the queue, printing each body to stdout.

use std::io::Write as _;
use std::process::ExitCode;

use dbqueue::cli::{self, DEQUEUE_HELP, INVALID_OPTIONS, Invocation};
use dbqueue::config::Config;
use dbqueue::engine::{AppContext, DrainOptions, run_dequeue};
use dbqueue::telemetry::{TelemetryConfig, init_telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let options = match cli::parse_dequeue(std::env::args().skip(1)) {
        Ok(Invocation::Help) => {
            println!("{DEQUEUE_HELP}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run(options)) => options,
        Err(e) => {
            eprintln!("Invalid options");
            eprintln!("{e}");
            println!("{DEQUEUE_HELP}");
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

async fn run(mut options: DrainOptions) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    options.poll_interval = config.poll_interval;

    let guard = init_telemetry(TelemetryConfig::for_service(&config, "dbqueue-dequeue"))?;
    tracing::debug!(otlp = guard.is_exporting(), "telemetry initialized");

    let span = tracing::info_span!("dequeue", queue = %config.queue_name);
    let ctx = AppContext::connect(&config, span).await?;

    let shutdown = ctx.shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        shutdown.trigger();
    });

    let mut stdout = std::io::stdout().lock();
    let report = run_dequeue(&ctx, &options, |_, text| {
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    })
    .await?;

    info!(
        processed = report.processed,
        cancelled = report.cancelled,
        "dequeue finished"
    );
    Ok(())
}
