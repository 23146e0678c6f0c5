//! Persistent State
//!
//! Plugins are one-shot processes, but some probes need memory: the last
//! position in a log file, a counter from the previous run, a baseline to
//! diff against. This module provides the two pieces for that:
//!
//! - [`Cookie`] - a small keyed store serialized to one JSON file, committed
//!   atomically so a crash mid-write never corrupts the previous state
//! - [`LogTail`] - built on a cookie record, yields the lines appended to a
//!   growing file since the last invocation and detects rotation
//!
//! The state file is the only resource shared across invocations. Each run
//! opens it, mutates in memory and commits on success; concurrent runs
//! against the same path are last-committed-wins.

pub mod cookie;
pub mod logtail;

pub use cookie::Cookie;
pub use logtail::{LogTail, TailLines};
