//! Check Orchestration
//!
//! The [`Check`] binds resources, evaluation contexts and a summary, and
//! drives one invocation through the probe pipeline:
//!
//! ```text
//! Resource(s) → Metric(s) → Context(s) → ResultSet → Report
//! ```
//!
//! Probes run concurrently; their metrics are merged in registration order
//! so two runs against the same system render identical reports. `run`
//! returns a [`Report`] and never exits the process itself; exit behavior
//! belongs to [`Runner`](crate::runtime::Runner).

use futures::future;
use tracing::debug;

use crate::context::{Context, ContextRegistry};
use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::perfdata::Performance;
use crate::resource::Resource;
use crate::result::ResultSet;
use crate::state::ServiceState;
use crate::summary::{DefaultSummary, Summary};

/// Phase of one check invocation.
///
/// `Failed` is terminal and reachable from any prior phase; the error that
/// caused it travels out of [`Check::run`] as the `Err` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    /// Nothing has run yet
    Idle,
    /// Resources are being probed
    Probing,
    /// Metrics are being judged by their contexts
    Evaluating,
    /// Partial outcomes are being reduced to one state
    Aggregating,
    /// The report text is being rendered
    Reporting,
    /// A report was produced
    Done,
    /// An unrecovered error aborted the invocation
    Failed,
}

impl std::fmt::Display for CheckPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckPhase::Idle => write!(f, "Idle"),
            CheckPhase::Probing => write!(f, "Probing"),
            CheckPhase::Evaluating => write!(f, "Evaluating"),
            CheckPhase::Aggregating => write!(f, "Aggregating"),
            CheckPhase::Reporting => write!(f, "Reporting"),
            CheckPhase::Done => write!(f, "Done"),
            CheckPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Orchestrator for one plugin invocation.
///
/// ```no_run
/// use sondeur::{Check, Runner, ScalarContext};
/// # use async_trait::async_trait;
/// # use sondeur::{Metric, Resource};
/// # struct Load;
/// # #[async_trait]
/// # impl Resource for Load {
/// #     async fn probe(&self) -> anyhow::Result<Vec<Metric>> { Ok(vec![]) }
/// # }
///
/// let check = Check::new()
///     .with_resource(Load)
///     .with_context(ScalarContext::new(
///         "load",
///         Some("0:4".parse().unwrap()),
///         Some("0:8".parse().unwrap()),
///     ));
/// Runner::new().run(check);
/// ```
pub struct Check {
    name: Option<String>,
    resources: Vec<Box<dyn Resource>>,
    contexts: ContextRegistry,
    summary: Box<dyn Summary>,
    phase: CheckPhase,
}

impl Check {
    pub fn new() -> Self {
        Check {
            name: None,
            resources: Vec::new(),
            contexts: ContextRegistry::new(),
            summary: Box::new(DefaultSummary),
            phase: CheckPhase::Idle,
        }
    }

    /// Registers a resource; probed in registration order.
    pub fn with_resource(mut self, resource: impl Resource + 'static) -> Self {
        self.resources.push(Box::new(resource));
        self
    }

    /// Registers an evaluation context under its own name.
    pub fn with_context(mut self, context: impl Context + 'static) -> Self {
        self.contexts.add(context);
        self
    }

    /// Replaces the default summary.
    pub fn with_summary(mut self, summary: impl Summary + 'static) -> Self {
        self.summary = Box::new(summary);
        self
    }

    /// Overrides the display name used as the status-line prefix.
    ///
    /// An empty name suppresses the prefix entirely.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The check's display name: the explicit override if set, else the
    /// first resource's name upper-cased, else empty.
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .resources
                .first()
                .map(|r| r.name().to_uppercase())
                .unwrap_or_default(),
        }
    }

    /// Current phase, for diagnostics.
    pub fn phase(&self) -> CheckPhase {
        self.phase
    }

    fn transition(&mut self, phase: CheckPhase) {
        debug!(from = %self.phase, to = %phase, "check phase transition");
        self.phase = phase;
    }

    /// Drives the full probe → evaluate → aggregate → report pipeline.
    ///
    /// Any error leaves the check in the `Failed` phase and is reported by
    /// the caller (normally [`Runner`](crate::runtime::Runner), which maps
    /// it to an Unknown report).
    pub async fn run(mut self) -> Result<Report> {
        let outcome = self.pipeline().await;
        if outcome.is_err() {
            self.transition(CheckPhase::Failed);
        }
        outcome
    }

    async fn pipeline(&mut self) -> Result<Report> {
        self.transition(CheckPhase::Probing);
        let metrics = self.probe_all().await?;

        self.transition(CheckPhase::Evaluating);
        let (results, perfdata) = self.evaluate_all(metrics)?;

        self.transition(CheckPhase::Aggregating);
        let state = results.most_significant_state();
        debug!(%state, results = results.len(), "aggregated");

        self.transition(CheckPhase::Reporting);
        let report = Report {
            name: self.name(),
            state,
            headline: self.summary.headline(&results),
            details: self.summary.verbose(&results),
            perfdata: perfdata.iter().map(Performance::to_string).collect(),
        };

        self.transition(CheckPhase::Done);
        Ok(report)
    }

    /// Probes every resource concurrently, merging metrics in registration
    /// order and stamping each with its resource of origin.
    async fn probe_all(&self) -> Result<Vec<Metric>> {
        let probes = self.resources.iter().map(|r| r.probe());
        let outcomes = future::join_all(probes).await;

        let mut metrics = Vec::new();
        for (resource, outcome) in self.resources.iter().zip(outcomes) {
            let name = resource.name();
            let probed = outcome.map_err(|source| Error::ProbeFailed {
                resource: name.clone(),
                source,
            })?;
            debug!(resource = %name, metrics = probed.len(), "probed");
            for mut metric in probed {
                metric.stamp_resource(&name);
                metrics.push(metric);
            }
        }
        Ok(metrics)
    }

    fn evaluate_all(&self, metrics: Vec<Metric>) -> Result<(ResultSet, Vec<Performance>)> {
        let mut results = ResultSet::new();
        let mut perfdata = Vec::new();
        for metric in metrics {
            let context = self.contexts.resolve(&metric)?;
            for result in context.evaluate(&metric)? {
                results.push(result);
            }
            if let Some(perf) = context.performance(&metric)? {
                perfdata.push(perf);
            }
        }
        Ok((results, perfdata))
    }
}

impl Default for Check {
    fn default() -> Self {
        Self::new()
    }
}

/// Rendered outcome of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    name: String,
    state: ServiceState,
    headline: String,
    details: Vec<String>,
    perfdata: Vec<String>,
}

impl Report {
    /// Builds the fixed Unknown report the guarded wrapper emits for
    /// unrecovered errors.
    pub(crate) fn unknown(name: String, message: String) -> Self {
        Report {
            name,
            state: ServiceState::Unknown,
            headline: message,
            details: Vec::new(),
            perfdata: Vec::new(),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// The process exit code mandated for this report.
    pub fn exit_code(&self) -> i32 {
        self.state.code()
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// First output line: `"<NAME> <STATE>: <headline>"`, with the name
    /// prefix omitted when the check has no name.
    pub fn status_line(&self) -> String {
        let state = self.state.to_string().to_uppercase();
        if self.name.is_empty() {
            format!("{}: {}", state, self.headline)
        } else {
            format!("{} {}: {}", self.name, state, self.headline)
        }
    }

    /// Full report text: status line, detail lines at verbosity one and
    /// up, and the trailing perf-data line when any metric declared output.
    pub fn render(&self, verbose: u8) -> String {
        let mut lines = vec![self.status_line()];
        if verbose >= 1 {
            lines.extend(self.details.iter().cloned());
        }
        if !self.perfdata.is_empty() {
            lines.push(format!("| {}", self.perfdata.join(" ")));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
