//! Hello world check.
//!
//! The smallest possible plugin: one resource, one metric routed to the
//! null context, always Ok.

use async_trait::async_trait;
use sondeur::{Check, Metric, Resource, Runner};

struct World;

#[async_trait]
impl Resource for World {
    async fn probe(&self) -> anyhow::Result<Vec<Metric>> {
        Ok(vec![Metric::new("world", 1.0).in_context("null")])
    }
}

fn main() {
    let check = Check::new().with_resource(World);
    Runner::new().run(check);
}
