use axum::{
    body::Bytes,
    debug_handler,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{any, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
#[allow(unused)]
use metrics::{counter, gauge, histogram};
use rand_distr::{Distribution, SkewNormal};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared state of one mock server.
#[derive(Default)]
pub struct MockState {
    hits: AtomicU64,
    tps: AtomicU64,
    limiters: RwLock<HashMap<String, Arc<DefaultDirectRateLimiter>>>,
}

impl MockState {
    /// Requests received since the server started.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    fn hit(&self) {
        counter!("mock-service.requests").increment(1);
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.tps.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/delay/ms/:delay_ms", any(delay))
        .route("/status/:code", any(status))
        .route("/jitter/ms/:mean_ms/:std_ms", any(jitter))
        .route("/limited/:max_tps/server/:server_id", any(limited))
        .route("/echo", post(echo))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub async fn run(addr: SocketAddr) {
    let listener = TcpListener::bind(&addr).await.unwrap();
    let state = Arc::new(MockState::default());
    tokio::spawn(tps_measure_task(state.clone()));
    axum::serve(listener, router(state)).await.unwrap();
}

/// A mock server running in the background on an ephemeral loopback port.
pub struct MockHandle {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn() -> std::io::Result<MockHandle> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(MockState::default());

    let app = router(state.clone());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    info!("Mock service listening on {addr}");
    Ok(MockHandle { addr, state })
}

#[debug_handler]
async fn delay(State(state): State<Arc<MockState>>, Path(delay_ms): Path<u64>) {
    state.hit();
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

async fn status(State(state): State<Arc<MockState>>, Path(code): Path<u16>) -> StatusCode {
    state.hit();
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn jitter(
    State(state): State<Arc<MockState>>,
    Path((mean_ms, std_ms)): Path<(u64, u64)>,
) -> Result<(), StatusCode> {
    state.hit();
    let normal = SkewNormal::new(mean_ms as f64, std_ms as f64, 20.)
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let delay_ms: f64 = normal.sample(&mut rand::thread_rng()).max(0.);
    histogram!("mock-service.jitter_ms").record(delay_ms);
    tokio::time::sleep(Duration::from_secs_f64(delay_ms / 1e3)).await;
    Ok(())
}

#[debug_handler]
async fn limited(
    State(state): State<Arc<MockState>>,
    Path((max_tps, server_id)): Path<(u32, String)>,
) -> Result<(), StatusCode> {
    state.hit();
    let max_tps = NonZeroU32::new(max_tps).ok_or(StatusCode::BAD_REQUEST)?;

    let read = state.limiters.read().unwrap().get(&server_id).cloned();
    let limiter = if let Some(limiter) = read {
        limiter
    } else {
        state
            .limiters
            .write()
            .unwrap()
            .entry(server_id)
            .or_insert_with(|| Arc::new(rate_limiter(max_tps)))
            .clone()
    };

    match limiter.check() {
        Ok(_) => Ok(()),
        Err(_) => {
            debug!("MOCK SERVER ___ LIMITED");
            Err(StatusCode::TOO_MANY_REQUESTS)
        }
    }
}

async fn echo(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Json<Value> {
    state.hit();
    let headers: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.to_string(), Value::String(value))
        })
        .collect();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    Json(json!({ "headers": headers, "body": body }))
}

/** Utils **/

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}

/** TPS Printer **/

pub async fn tps_measure_task(state: Arc<MockState>) {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let transactions = state.tps.swap(0, Ordering::Relaxed);
        info!("{transactions} TPS");
        gauge!("mock-service.tps").set(transactions as f64);
    }
}
