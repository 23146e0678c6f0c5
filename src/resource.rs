//! Resources
//!
//! A resource is the probe side of a plugin: it inspects some part of the
//! system (a file, a socket, a subprocess, an HTTP endpoint) and reports
//! what it measured as a list of metrics. Probing is the only place in the
//! pipeline where blocking I/O is expected.

use async_trait::async_trait;

use crate::metric::Metric;

/// A probe producing metrics.
///
/// Probes run concurrently when a check holds several resources, so
/// implementations must be `Send + Sync`. Returning an error aborts the
/// whole invocation: the runner reports it with Unknown severity.
///
/// ```
/// use async_trait::async_trait;
/// use sondeur::{Metric, Resource};
///
/// struct Uptime;
///
/// #[async_trait]
/// impl Resource for Uptime {
///     async fn probe(&self) -> anyhow::Result<Vec<Metric>> {
///         let uptime = tokio::fs::read_to_string("/proc/uptime").await?;
///         let seconds: f64 = uptime
///             .split_whitespace()
///             .next()
///             .ok_or_else(|| anyhow::anyhow!("empty /proc/uptime"))?
///             .parse()?;
///         Ok(vec![Metric::new("uptime", seconds).with_uom("s")])
///     }
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync {
    /// Inspects the system and reports measurements.
    async fn probe(&self) -> anyhow::Result<Vec<Metric>>;

    /// Display name of this resource.
    ///
    /// Defaults to the implementing type's bare name; the first resource's
    /// name (upper-cased) becomes the check's default status-line prefix.
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}
