//! Summaries
//!
//! A summary turns an evaluated result set into the text of the status
//! report. It is pure formatting: no re-evaluation, no mutation. Plugins
//! override it to customize wording; the default keeps quiet about healthy
//! metrics and surfaces only the most significant problems.

use crate::result::ResultSet;
use crate::state::ServiceState;

/// Formats a result set into the status line and detail lines.
pub trait Summary: Send + Sync {
    /// Headline when every result is Ok (or the set is empty).
    fn ok(&self, results: &ResultSet) -> String {
        let _ = results;
        "all metrics ok".to_string()
    }

    /// Headline when at least one result is more significant than Ok.
    ///
    /// The default joins the explanations of all most-significant results,
    /// in insertion order; healthy results stay out of the top line.
    fn problem(&self, results: &ResultSet) -> String {
        let parts: Vec<String> = results
            .most_significant()
            .iter()
            .map(|r| r.explanation())
            .collect();
        parts.join(", ")
    }

    /// Additional detail lines shown at verbosity one and up.
    ///
    /// The default lists every non-Ok result as `"<state>: <explanation>"`.
    fn verbose(&self, results: &ResultSet) -> Vec<String> {
        results
            .iter()
            .filter(|r| r.state() != ServiceState::Ok)
            .map(|r| format!("{}: {}", r.state(), r.explanation()))
            .collect()
    }

    /// Dispatches on the overall state.
    fn headline(&self, results: &ResultSet) -> String {
        if results.most_significant_state() == ServiceState::Ok {
            self.ok(results)
        } else {
            self.problem(results)
        }
    }
}

/// The stock summary used by checks unless a custom one is supplied.
#[derive(Debug, Default)]
pub struct DefaultSummary;

impl Summary for DefaultSummary {}
