//! Check Results
//!
//! A [`CheckResult`] is the outcome of evaluating one metric (or of a
//! free-standing condition): a service state, an optional explanation, and a
//! back-reference to the originating metric. A [`ResultSet`] collects them
//! in insertion order for one check invocation.

use crate::metric::Metric;
use crate::state::{worst, ServiceState};

/// Outcome of a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    state: ServiceState,
    hint: Option<String>,
    metric: Option<Metric>,
}

impl CheckResult {
    /// Creates a result with an explanation but no originating metric.
    pub fn new(state: ServiceState, hint: impl Into<String>) -> Self {
        CheckResult {
            state,
            hint: Some(hint.into()),
            metric: None,
        }
    }

    /// Creates a result for a metric, with an optional explanation.
    pub fn for_metric(state: ServiceState, metric: Metric, hint: Option<String>) -> Self {
        CheckResult {
            state,
            hint,
            metric: Some(metric),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn metric(&self) -> Option<&Metric> {
        self.metric.as_ref()
    }

    /// Name of the resource the originating metric was probed from.
    pub fn resource(&self) -> Option<&str> {
        self.metric.as_ref().and_then(Metric::resource)
    }

    /// The rendered explanation: the hint if present, otherwise
    /// `"<name> is <value><uom>"` derived from the metric.
    pub fn explanation(&self) -> String {
        if let Some(hint) = &self.hint {
            return hint.clone();
        }
        match &self.metric {
            Some(metric) => format!("{} is {}", metric.name(), metric),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.explanation())
    }
}

/// Ordered, append-only collection of results for one invocation.
#[derive(Debug, Default)]
pub struct ResultSet {
    results: Vec<CheckResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CheckResult> {
        self.results.get(index)
    }

    /// Looks up the first result whose originating metric carries `name`.
    pub fn by_name(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|r| r.metric().is_some_and(|m| m.name() == name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckResult> {
        self.results.iter()
    }

    /// The most significant state in the set; `Ok` when the set is empty.
    pub fn most_significant_state(&self) -> ServiceState {
        worst(self.results.iter().map(CheckResult::state))
    }

    /// All results carrying the most significant state, in insertion order.
    pub fn most_significant(&self) -> Vec<&CheckResult> {
        let state = self.most_significant_state();
        self.results.iter().filter(|r| r.state() == state).collect()
    }

    /// True if any result is at least as significant as `state`.
    pub fn contains_at_least(&self, state: ServiceState) -> bool {
        self.results.iter().any(|r| r.state() >= state)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<CheckResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = CheckResult>>(iter: I) -> Self {
        ResultSet {
            results: iter.into_iter().collect(),
        }
    }
}
