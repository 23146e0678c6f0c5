//! Sondeur - Monitoring Plugin Toolkit
//!
//! A toolkit for writing monitoring check plugins: probe a resource,
//! evaluate the measured values against operator-supplied thresholds,
//! aggregate the partial outcomes into one overall severity and report it
//! through the fixed plugin convention (one status line plus optional
//! details, process exit code equal to the severity rank).
//!
//! # Architecture
//!
//! One invocation flows through a fixed pipeline:
//!
//! ```text
//! Resource(s) ──▶ Metric(s) ──▶ Context(s) ──▶ ResultSet ──▶ Report
//!   (probe)       (measure)     (evaluate)     (aggregate)    (render)
//! ```
//!
//! The [`Check`] drives the pipeline; the [`Runner`] wraps it in an error
//! boundary so the plugin always exits with one of the four defined codes,
//! no matter what failed underneath.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use sondeur::{Check, Metric, Resource, Runner, ScalarContext};
//!
//! struct Load;
//!
//! #[async_trait]
//! impl Resource for Load {
//!     async fn probe(&self) -> anyhow::Result<Vec<Metric>> {
//!         let raw = tokio::fs::read_to_string("/proc/loadavg").await?;
//!         let load1: f64 = raw.split_whitespace().next().unwrap_or("0").parse()?;
//!         Ok(vec![Metric::new("load1", load1).with_min(0.0).in_context("load")])
//!     }
//! }
//!
//! fn main() {
//!     let check = Check::new().with_resource(Load).with_context(ScalarContext::new(
//!         "load",
//!         Some("0:4".parse().unwrap()),
//!         Some("0:8".parse().unwrap()),
//!     ));
//!     Runner::new().run(check); // prints the report and exits 0/1/2/3
//! }
//! ```
//!
//! # Modules
//!
//! - [`check`] - orchestration of one invocation
//! - [`cli`] - clap helpers for the standard plugin flags
//! - [`context`] - evaluation policies (thresholds and custom)
//! - [`error`] - error types
//! - [`metric`] - measurement value objects
//! - [`perfdata`] - performance data rendering
//! - [`range`] - threshold range expressions
//! - [`resource`] - the probe trait
//! - [`result`] - evaluation outcomes and their collection
//! - [`runtime`] - guarded runner and exit behavior
//! - [`state`] - the four service states
//! - [`store`] - persistent state between invocations (cookie, log tail)
//! - [`summary`] - report wording
//! - [`timespan`] - human-friendly durations

pub mod check;
pub mod cli;
pub mod context;
pub mod error;
pub mod metric;
pub mod perfdata;
pub mod range;
pub mod resource;
pub mod result;
pub mod runtime;
pub mod state;
pub mod store;
pub mod summary;
pub mod timespan;

// Re-export the types a typical plugin touches
pub use check::{Check, CheckPhase, Report};
pub use context::{Context, ContextRegistry, GenericContext, NullContext, ScalarContext};
pub use error::{Error, Result};
pub use metric::Metric;
pub use perfdata::Performance;
pub use range::Range;
pub use resource::Resource;
pub use result::{CheckResult, ResultSet};
pub use runtime::Runner;
pub use state::{worst, ServiceState};
pub use store::{Cookie, LogTail};
pub use summary::{DefaultSummary, Summary};
