use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use volley_runtime::{
    runtime::{load_env_file, DEFAULT_LOG_FILTER},
    RuntimeError, VolleyRuntime,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before logging so `RUST_LOG` may come from the file too.
    let env_file = load_env_file(None);

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = env_file {
        error!("{err}");
        return ExitCode::from(err.exit_code());
    }

    let runtime = VolleyRuntime::with_args();
    match run(&runtime).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(runtime: &VolleyRuntime) -> Result<String, RuntimeError> {
    let summary = runtime.run().await?;
    runtime.render(&summary)
}
