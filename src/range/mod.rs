//! Threshold Ranges
//!
//! Implements the monitoring-plugin range expression language. The general
//! format is `[@][start:][end]`: `start:` may be omitted if start is 0,
//! `~` as start means negative infinity, an omitted end means positive
//! infinity, and a leading `@` inverts the alert condition.
//!
//! See
//! https://github.com/monitoring-plugins/monitoring-plugin-guidelines/blob/main/definitions/01.range_expressions.md
//! for the upstream definition.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[cfg(test)]
mod proptest;

/// A parsed threshold range.
///
/// `matches` answers "does this value alert?": a value alerts when it lies
/// outside `[start, end]`, or inside when the range is inverted with `@`.
///
/// ```
/// use sondeur::Range;
///
/// let warn: Range = "10:20".parse().unwrap();
/// assert!(!warn.matches(15.0));
/// assert!(warn.matches(25.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    start: f64,
    end: f64,
    invert: bool,
}

impl Range {
    /// Creates a range alerting outside `[start, end]`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        Self::build(start, end, false)
    }

    /// Creates an inverted range alerting inside `[start, end]`.
    pub fn inverted(start: f64, end: f64) -> Result<Self> {
        Self::build(start, end, true)
    }

    fn build(start: f64, end: f64, invert: bool) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_range(
                format!("{}:{}", fmt_bound(start), fmt_bound(end)),
                "start must not be greater than end",
            ));
        }
        Ok(Range { start, end, invert })
    }

    /// Lower bound; negative infinity for `~:` specs.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound; positive infinity if omitted in the spec.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether the alert condition is inverted (`@` prefix).
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Decides whether `value` triggers the alert condition.
    ///
    /// Non-finite measurements cannot be judged against any bound, so NaN
    /// always alerts.
    pub fn matches(&self, value: f64) -> bool {
        if value.is_nan() {
            return true;
        }
        let inside = value >= self.start && value <= self.end;
        if self.invert {
            inside
        } else {
            !inside
        }
    }

    /// Human-readable description of why a value does not pass.
    ///
    /// Unlike `Display`, a zero start is kept so the full bounds show up in
    /// result explanations.
    pub fn violation(&self) -> String {
        format!("outside range {}", self.format(false))
    }

    fn format(&self, omit_zero_start: bool) -> String {
        let mut out = String::new();
        if self.invert {
            out.push('@');
        }
        if self.start == f64::NEG_INFINITY {
            out.push_str("~:");
        } else if !omit_zero_start || self.start != 0.0 {
            out.push_str(&fmt_bound(self.start));
            out.push(':');
        }
        if self.end != f64::INFINITY {
            out.push_str(&fmt_bound(self.end));
        }
        out
    }
}

impl fmt::Display for Range {
    /// Canonical range specification, parseable back into an equal `Range`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(true))
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::invalid_range(spec, "empty range specification"));
        }
        let (invert, rest) = match spec.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let parts: Vec<&str> = rest.split(':').collect();
        let (start, end) = match parts.as_slice() {
            // A single number is shorthand for 0:number.
            [end] => (0.0, parse_bound(spec, end, f64::INFINITY)?),
            [start, end] => {
                let start = if *start == "~" {
                    f64::NEG_INFINITY
                } else {
                    parse_bound(spec, start, 0.0)?
                };
                (start, parse_bound(spec, end, f64::INFINITY)?)
            }
            _ => return Err(Error::invalid_range(spec, "too many ':' separators")),
        };
        Self::build(start, end, invert).map_err(|_| {
            Error::invalid_range(spec, "start must not be greater than end")
        })
    }
}

fn parse_bound(spec: &str, atom: &str, default: f64) -> Result<f64> {
    if atom.is_empty() {
        return Ok(default);
    }
    match atom.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::invalid_range(
            spec,
            format!("'{atom}' is not a number"),
        )),
    }
}

/// Formats a bound without a trailing `.0` for whole numbers.
fn fmt_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
