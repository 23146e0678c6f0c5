//! Metrics
//!
//! A [`Metric`] is one named measurement produced by a resource's probe. It
//! carries the raw value plus everything a context needs to evaluate and
//! report it: an optional unit of measure, optional value bounds, and the
//! name of the evaluation context responsible for it.

use serde::{Deserialize, Serialize};

/// A single named measurement.
///
/// Metrics are immutable once probed; builder-style constructors cover the
/// optional fields:
///
/// ```
/// use sondeur::Metric;
///
/// let load = Metric::new("load1", 0.42).with_min(0.0);
/// let temp = Metric::new("temperature", 71.3)
///     .with_uom("C")
///     .in_context("sensor");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    name: String,
    value: f64,
    uom: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    context: Option<String>,
    resource: Option<String>,
}

impl Metric {
    /// Creates a metric with just a name and a value.
    ///
    /// The name must be non-empty and unique within one resource's probe
    /// output for a given context.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "metric name must not be empty");
        Metric {
            name,
            value,
            uom: None,
            min: None,
            max: None,
            context: None,
            resource: None,
        }
    }

    /// Attaches a unit of measure, e.g. `"ms"` or `"B"`.
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    /// Declares the lowest value the measurement can take.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Declares the highest value the measurement can take.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Routes this metric to a named evaluation context.
    ///
    /// Without this, the metric is evaluated by the `"default"` context.
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn uom(&self) -> Option<&str> {
        self.uom.as_deref()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Name of the context that evaluates this metric.
    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or("default")
    }

    /// Name of the resource this metric came from, once the orchestrator
    /// has stamped it.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub(crate) fn stamp_resource(&mut self, resource: &str) {
        self.resource = Some(resource.to_string());
    }
}

impl std::fmt::Display for Metric {
    /// Renders `<value><uom>`, e.g. `75C` or `0.42`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", fmt_number(self.value), self.uom().unwrap_or(""))
    }
}

/// Formats a value without a trailing `.0` for whole numbers.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let m = Metric::new("users", 12.0)
            .with_uom("u")
            .with_min(0.0)
            .with_max(100.0)
            .in_context("capacity");
        assert_eq!(m.name(), "users");
        assert_eq!(m.value(), 12.0);
        assert_eq!(m.uom(), Some("u"));
        assert_eq!(m.min(), Some(0.0));
        assert_eq!(m.max(), Some(100.0));
        assert_eq!(m.context(), "capacity");
    }

    #[test]
    fn test_context_defaults() {
        assert_eq!(Metric::new("x", 1.0).context(), "default");
    }

    #[test]
    fn test_display_trims_whole_numbers() {
        assert_eq!(Metric::new("x", 10.0).to_string(), "10");
        assert_eq!(Metric::new("x", 10.5).to_string(), "10.5");
        assert_eq!(Metric::new("x", 10.0).with_uom("ms").to_string(), "10ms");
    }

    #[test]
    fn test_resource_stamp() {
        let mut m = Metric::new("x", 1.0);
        assert_eq!(m.resource(), None);
        m.stamp_resource("load");
        assert_eq!(m.resource(), Some("load"));
    }
}
