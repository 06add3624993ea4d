pub mod cli;
mod error;
mod report;
pub mod runtime;

pub use crate::cli::VolleyCli;
pub use crate::error::RuntimeError;
pub use crate::runtime::VolleyRuntime;
