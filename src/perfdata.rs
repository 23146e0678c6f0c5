//! Performance Data
//!
//! Renders the `label=value[uom];warn;crit;min;max` tokens that monitoring
//! engines parse off the trailing `|` section of a plugin's output. Absent
//! fields are dropped, labels with shell-hostile characters are quoted, and
//! ranges use their canonical string form.

use std::fmt;

use crate::error::{Error, Result};
use crate::metric::{fmt_number, Metric};
use crate::range::Range;

/// One performance data token.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    label: String,
    value: f64,
    uom: Option<String>,
    warn: Option<Range>,
    crit: Option<Range>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Performance {
    /// Creates a token for `label` and `value`.
    ///
    /// Labels may contain spaces and most special characters (they are
    /// single-quoted on output), but `'` and `=` cannot be represented in
    /// the perf-data grammar at all and are rejected with
    /// [`Error::InvalidPerfLabel`].
    pub fn new(label: impl Into<String>, value: f64) -> Result<Self> {
        let label = label.into();
        if label.contains('\'') || label.contains('=') {
            return Err(Error::InvalidPerfLabel(label));
        }
        Ok(Performance {
            label,
            value,
            uom: None,
            warn: None,
            crit: None,
            min: None,
            max: None,
        })
    }

    /// Builds a token from a metric plus the thresholds it was judged by.
    pub fn from_metric(metric: &Metric, warn: Option<Range>, crit: Option<Range>) -> Result<Self> {
        let mut perf = Performance::new(metric.name(), metric.value())?;
        perf.uom = metric.uom().map(str::to_string);
        perf.warn = warn;
        perf.crit = crit;
        perf.min = metric.min();
        perf.max = metric.max();
        Ok(perf)
    }

    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn with_warn(mut self, warn: Range) -> Self {
        self.warn = Some(warn);
        self
    }

    pub fn with_crit(mut self, crit: Range) -> Self {
        self.crit = Some(crit);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn quoted_label(&self) -> String {
        let plain = self
            .label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            self.label.clone()
        } else {
            format!("'{}'", self.label)
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}{}",
            self.quoted_label(),
            fmt_number(self.value),
            self.uom.as_deref().unwrap_or("")
        )?;
        // Absent fields are dropped entirely, in warn;crit;min;max order.
        let fields = [
            self.warn.as_ref().map(Range::to_string),
            self.crit.as_ref().map(Range::to_string),
            self.min.map(fmt_number),
            self.max.map(fmt_number),
        ];
        for field in fields.into_iter().flatten() {
            write!(f, ";{field}")?;
        }
        Ok(())
    }
}
