#[derive(Copy, Clone, Debug)]
pub struct RequestLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

/// Metric names emitted for every request when the `metrics` feature is on.
pub const DEFAULT_LABELS: RequestLabels = RequestLabels {
    success: "volley_request_success",
    error: "volley_request_error",
    latency: "volley_request_latency",
};
