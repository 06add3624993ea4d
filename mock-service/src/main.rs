use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=info,tower_http=info")),
        )
        .init();

    PrometheusBuilder::new()
        .with_http_listener("0.0.0.0:8002".parse::<SocketAddr>().unwrap())
        .install()
        .unwrap();

    let addr: SocketAddr = "0.0.0.0:3002".parse().unwrap();
    mock_service::run(addr).await;
}
