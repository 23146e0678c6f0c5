//! Command Line Helpers
//!
//! The standard flag block shared by most plugins: warning/critical
//! thresholds, a timeout and a verbosity counter. Thresholds are parsed
//! into [`Range`] values at argument time, so a malformed spec is rejected
//! with a usage error before any probing starts.

use std::time::Duration;

use crate::context::ScalarContext;
use crate::range::Range;
use crate::runtime::Runner;
use crate::timespan;

/// Reusable plugin flags; flatten into a `clap::Parser` struct.
///
/// ```
/// use clap::Parser;
/// use sondeur::cli::PluginArgs;
///
/// #[derive(Parser)]
/// #[command(name = "check_load")]
/// struct Cli {
///     #[command(flatten)]
///     plugin: PluginArgs,
/// }
///
/// let cli = Cli::parse_from(["check_load", "-w", "0:4", "-c", "0:8", "-v"]);
/// assert_eq!(cli.plugin.verbose, 1);
/// ```
#[derive(Debug, clap::Args)]
pub struct PluginArgs {
    /// Warning threshold range
    #[arg(short = 'w', long, value_name = "RANGE")]
    pub warning: Option<Range>,

    /// Critical threshold range
    #[arg(short = 'c', long, value_name = "RANGE")]
    pub critical: Option<Range>,

    /// Abort the check after this long, e.g. "30s" or "1m30s"
    #[arg(short = 't', long, value_name = "TIMESPAN", value_parser = timespan::parse_duration)]
    pub timeout: Option<Duration>,

    /// Increase output verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl PluginArgs {
    /// Builds a scalar context under `name` from the threshold flags.
    pub fn scalar_context(&self, name: impl Into<String>) -> ScalarContext {
        ScalarContext::new(name, self.warning, self.critical)
    }

    /// Builds a runner honoring the verbosity and timeout flags.
    pub fn runner(&self) -> Runner {
        let runner = Runner::new().with_verbose(self.verbose);
        match self.timeout {
            Some(timeout) => runner.with_timeout(timeout),
            None => runner,
        }
    }
}

/// Starts a `clap::Command` for a plugin.
///
/// Monitoring plugin binaries are conventionally named `check_<something>`;
/// the prefix is added unless `name` already carries it.
pub fn command(name: &str) -> clap::Command {
    let prog = if name.starts_with("check_") {
        name.to_string()
    } else {
        format!("check_{name}")
    };
    clap::Command::new(prog)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(name = "check_test")]
    struct Cli {
        #[command(flatten)]
        plugin: PluginArgs,
    }

    #[test]
    fn test_threshold_flags_parse_into_ranges() {
        let cli = Cli::parse_from(["check_test", "-w", "0:4", "-c", "0:8"]);
        assert_eq!(cli.plugin.warning.unwrap().to_string(), "4");
        assert_eq!(cli.plugin.critical.unwrap().to_string(), "8");
    }

    #[test]
    fn test_bad_range_fails_before_probing() {
        assert!(Cli::try_parse_from(["check_test", "-w", "20:10"]).is_err());
        assert!(Cli::try_parse_from(["check_test", "-c", "garbage"]).is_err());
    }

    #[test]
    fn test_verbose_counts() {
        assert_eq!(Cli::parse_from(["check_test"]).plugin.verbose, 0);
        assert_eq!(Cli::parse_from(["check_test", "-vvv"]).plugin.verbose, 3);
    }

    #[test]
    fn test_timeout_uses_timespans() {
        let cli = Cli::parse_from(["check_test", "-t", "1m30s"]);
        assert_eq!(cli.plugin.timeout, Some(Duration::from_secs(90)));
        assert!(Cli::try_parse_from(["check_test", "-t", "soon"]).is_err());
    }

    #[test]
    fn test_scalar_context_from_flags() {
        let cli = Cli::parse_from(["check_test", "-w", "0:4"]);
        let ctx = cli.plugin.scalar_context("load");
        use crate::context::Context;
        assert_eq!(ctx.name(), "load");
    }

    #[test]
    fn test_command_name_prefixing() {
        assert_eq!(command("test").get_name(), "check_test");
        assert_eq!(command("check_test").get_name(), "check_test");
    }
}
