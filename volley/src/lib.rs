#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod aggregator;
pub mod client;
pub mod dispatcher;
mod error;
pub mod gate;
pub mod run;
pub mod task;

pub use aggregator::ResultsAggregator;
pub use client::ReqwestClient;
pub use dispatcher::Dispatcher;
pub use error::{Error, TransportError};
pub use gate::{GatePermit, RateGate};
pub use run::run_batch;
pub use task::{HttpClient, HttpResponse, LocalHttpClient, RequestTask};

pub mod prelude {
    pub use crate::{run_batch, HttpClient, RateGate, ReqwestClient};
    pub use volley_core::{ConfigError, Method, RunConfig, Summary, ThroughputUnit};
}
