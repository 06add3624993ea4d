//! Default volley runtime
//!
//! Turns the command line (or its environment variables) into a validated run configuration,
//! runs the batch against the real target and renders the summary.
use crate::{cli::VolleyCli, error::RuntimeError, report};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::{Path, PathBuf};
#[allow(unused)]
use tracing::{debug, error, info, instrument, warn};
use volley::{run_batch, ReqwestClient};
use volley_core::Summary;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "volley=info,volley_runtime=info";

/// Export the variables of a `.env` file into the process environment, so the CLI falls back on
/// them for any option not given on the command line.
///
/// Without a path, `.env` is searched for in the working directory and its parents. Variables
/// already present in the environment are left alone. A missing file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, RuntimeError> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// # Example
///
/// ```ignore
/// #[tokio::main]
/// async fn main() {
///     let runtime = VolleyRuntime::with_args();
///     let summary = runtime.run().await.unwrap();
///     println!("{}", runtime.render(&summary).unwrap());
/// }
/// ```
pub struct VolleyRuntime {
    cli: VolleyCli,
}

impl VolleyRuntime {
    pub fn new(cli: VolleyCli) -> Self {
        Self { cli }
    }

    /// Read options from the process arguments and environment. Exits on invalid arguments.
    pub fn with_args() -> Self {
        Self::new(VolleyCli::parse())
    }

    /// Validate the configuration and run the whole batch.
    ///
    /// Configuration problems are reported before any request is sent. Failed requests never
    /// surface here; they are counted in the returned summary.
    #[instrument(name = "volley", skip_all)]
    pub async fn run(&self) -> Result<Summary, RuntimeError> {
        let config = self.cli.run_config()?;
        let client = ReqwestClient::new(&config)?;

        if let Some(addr) = self.cli.metrics_addr {
            PrometheusBuilder::new().with_http_listener(addr).install()?;
            info!("Serving metrics on {addr}");
        }

        Ok(run_batch(&config, client).await?)
    }

    pub fn render(&self, summary: &Summary) -> Result<String, RuntimeError> {
        Ok(report::render(summary, self.cli.json)?)
    }
}
