use mock_service::MockHandle;
use std::sync::OnceLock;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs logging once per test binary and starts a fresh mock service for the calling test.
#[allow(unused)]
pub async fn init() -> MockHandle {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("volley=debug,mock_service=debug")),
            )
            .with_test_writer()
            .try_init();
    });

    mock_service::spawn().await.unwrap()
}
