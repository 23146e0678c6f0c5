//! Plugin Runtime
//!
//! [`Runner`] is the guarded entry point of a plugin. It owns the one
//! externally observable side effect of the pipeline: writing the report to
//! stdout and terminating the process with the state's exit code. Every
//! failure that escapes the check (probe errors, unregistered contexts,
//! state-file I/O, timeouts) is caught here, exactly once, and reported as
//! an Unknown result. A plugin built on `Runner` always exits 0, 1, 2 or 3
//! and never dumps a panic or error trace onto stdout, which alerting
//! systems would misparse.

use std::time::Duration;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::check::{Check, Report};
use crate::error::Error;

/// Guarded runner for a [`Check`].
///
/// ```no_run
/// use sondeur::{Check, Runner};
///
/// let check = Check::new(); // plus resources and contexts
/// Runner::new().with_verbose(1).run(check);
/// ```
#[derive(Debug, Default)]
pub struct Runner {
    verbose: u8,
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the verbosity level (the `-v` count): 1 adds detail lines to
    /// the report, 2 logs error chains, 3 turns on trace logging.
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Bounds the whole pipeline; overruns are reported as Unknown.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs the check inside the error boundary and returns its report.
    ///
    /// This never fails: any [`Error`] is mapped to an Unknown report with
    /// the error message as headline. The error's source chain goes to the
    /// log (stderr) at verbosity two and up, never to stdout.
    pub async fn execute(&self, check: Check) -> Report {
        let name = check.name();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, check.run()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout(limit)),
            },
            None => check.run().await,
        };
        match outcome {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "check aborted");
                if self.verbose >= 2 {
                    let mut source = std::error::Error::source(&err);
                    while let Some(cause) = source {
                        debug!(%cause, "caused by");
                        source = cause.source();
                    }
                }
                Report::unknown(name, err.to_string())
            }
        }
    }

    /// Runs the check to completion and exits the process.
    ///
    /// Sets up stderr logging, builds a tokio runtime, executes the check
    /// guarded, prints the rendered report to stdout and exits with the
    /// report's code. Does not return.
    pub fn run(self, check: Check) -> ! {
        self.init_logging();
        let name = check.name();
        let report = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(self.execute(check)),
            Err(err) => Report::unknown(name, format!("runtime setup failed: {err}")),
        };
        print!("{}", report.render(self.verbose));
        std::process::exit(report.exit_code());
    }

    /// Installs the stderr tracing subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise the level follows the verbosity
    /// flag. Logs must stay off stdout, which belongs to the report.
    fn init_logging(&self) {
        let default_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
