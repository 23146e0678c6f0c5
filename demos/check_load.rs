//! Load average check.
//!
//! Reads `/proc/loadavg` and evaluates all three load averages against the
//! warning/critical ranges supplied on the command line:
//!
//! ```text
//! check_load -w 0:4 -c 0:8 -v
//! ```

use async_trait::async_trait;
use clap::Parser;
use sondeur::cli::PluginArgs;
use sondeur::{Check, Metric, Resource};

#[derive(Parser)]
#[command(name = "check_load", about = "Check the system load average")]
struct Cli {
    #[command(flatten)]
    plugin: PluginArgs,
}

struct Load;

#[async_trait]
impl Resource for Load {
    async fn probe(&self) -> anyhow::Result<Vec<Metric>> {
        let raw = tokio::fs::read_to_string("/proc/loadavg").await?;
        let mut fields = raw.split_whitespace();
        let mut metrics = Vec::new();
        for name in ["load1", "load5", "load15"] {
            let value: f64 = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("unexpected /proc/loadavg format"))?
                .parse()?;
            metrics.push(Metric::new(name, value).with_min(0.0).in_context("load"));
        }
        Ok(metrics)
    }
}

fn main() {
    let cli = Cli::parse();
    let check = Check::new()
        .with_resource(Load)
        .with_context(cli.plugin.scalar_context("load"));
    cli.plugin.runner().run(check);
}
