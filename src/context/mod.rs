//! Evaluation Contexts
//!
//! A context turns raw metrics into check results by applying an evaluation
//! policy. The built-in [`ScalarContext`] compares a numeric value against
//! operator-supplied warning/critical ranges; custom policies (unit
//! conversion, statistics over cookie state, ...) implement the [`Context`]
//! trait and register under the name their metrics reference.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::perfdata::Performance;
use crate::range::Range;
use crate::result::CheckResult;
use crate::state::ServiceState;

/// Evaluation policy bound to a metric name.
///
/// `evaluate` must return at least one result per metric; errors are
/// reserved for genuinely fatal conditions and abort the whole invocation.
pub trait Context: Send + Sync + std::fmt::Debug {
    /// Registry key; metrics select their context by this name.
    fn name(&self) -> &str;

    /// Judges a metric, producing one or more results.
    ///
    /// The default implementation accepts everything as [`ServiceState::Ok`].
    fn evaluate(&self, metric: &Metric) -> Result<Vec<CheckResult>> {
        Ok(vec![CheckResult::for_metric(
            ServiceState::Ok,
            metric.clone(),
            None,
        )])
    }

    /// Renders the metric's performance data token, if it emits one.
    fn performance(&self, metric: &Metric) -> Result<Option<Performance>> {
        let _ = metric;
        Ok(None)
    }

    /// Human-readable description of a metric, used in explanations.
    fn describe(&self, metric: &Metric) -> String {
        format!("{} is {}", metric.name(), metric)
    }
}

/// Plain pass-through context; every metric evaluates to Ok.
///
/// Registered as `"default"` so metrics without an explicit context have a
/// home.
#[derive(Debug)]
pub struct GenericContext {
    name: String,
}

impl GenericContext {
    pub fn new(name: impl Into<String>) -> Self {
        GenericContext { name: name.into() }
    }
}

impl Context for GenericContext {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Context for metrics that only exist for their side channel (e.g. booleans
/// driving a custom summary). Evaluates to Ok, describes as nothing, emits
/// no performance data.
#[derive(Debug)]
pub struct NullContext;

impl Context for NullContext {
    fn name(&self) -> &str {
        "null"
    }

    fn describe(&self, _metric: &Metric) -> String {
        String::new()
    }
}

/// Threshold evaluation against warning/critical ranges.
///
/// The critical range is always tested first: when both thresholds match
/// the same value the result must be Critical, never a silent downgrade to
/// Warning.
#[derive(Debug)]
pub struct ScalarContext {
    name: String,
    warning: Option<Range>,
    critical: Option<Range>,
}

impl ScalarContext {
    /// Creates a scalar context; either threshold may be absent.
    pub fn new(name: impl Into<String>, warning: Option<Range>, critical: Option<Range>) -> Self {
        ScalarContext {
            name: name.into(),
            warning,
            critical,
        }
    }

    /// A scalar context without thresholds: always Ok, but still emits
    /// performance data.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    fn verdict(&self, value: f64) -> (ServiceState, Option<&Range>) {
        if let Some(critical) = &self.critical {
            if critical.matches(value) {
                return (ServiceState::Critical, Some(critical));
            }
        }
        if let Some(warning) = &self.warning {
            if warning.matches(value) {
                return (ServiceState::Warning, Some(warning));
            }
        }
        (ServiceState::Ok, None)
    }
}

impl Context for ScalarContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, metric: &Metric) -> Result<Vec<CheckResult>> {
        let (state, violated) = self.verdict(metric.value());
        let hint = violated.map(|range| {
            format!("{} ({})", self.describe(metric), range.violation())
        });
        Ok(vec![CheckResult::for_metric(state, metric.clone(), hint)])
    }

    fn performance(&self, metric: &Metric) -> Result<Option<Performance>> {
        Performance::from_metric(metric, self.warning, self.critical).map(Some)
    }
}

/// Holds every registered context for one check, keyed by name.
///
/// `"default"` and `"null"` are always present.
pub struct ContextRegistry {
    by_name: HashMap<String, Box<dyn Context>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        let mut registry = ContextRegistry {
            by_name: HashMap::new(),
        };
        registry.add(GenericContext::new("default"));
        registry.add(NullContext);
        registry
    }

    /// Registers a context under its own name, replacing any previous one.
    pub fn add(&mut self, context: impl Context + 'static) {
        self.by_name
            .insert(context.name().to_string(), Box::new(context));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Context> {
        self.by_name.get(name).map(Box::as_ref)
    }

    /// Resolves the context a metric asks for.
    ///
    /// A named context that was never registered is a configuration bug in
    /// the plugin, reported as [`Error::UnknownContext`].
    pub(crate) fn resolve(&self, metric: &Metric) -> Result<&dyn Context> {
        self.get(metric.context()).ok_or_else(|| Error::UnknownContext {
            metric: metric.name().to_string(),
            context: metric.context().to_string(),
        })
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}
