use thiserror::Error;
use volley_core::ConfigError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Volley(#[from] volley::Error),

    #[error("failed to install Prometheus exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("failed to render summary: {0}")]
    Render(#[from] serde_json::Error),
}

impl RuntimeError {
    /// Process exit code: 2 for bad configuration, 1 for anything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            RuntimeError::Config(_)
            | RuntimeError::EnvFile(_)
            | RuntimeError::Volley(volley::Error::Config(_)) => 2,
            _ => 1,
        }
    }
}
