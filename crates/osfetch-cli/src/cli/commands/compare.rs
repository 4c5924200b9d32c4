//! `osfetch compare <target> <path>` – is the remote or the local copy newer?

use anyhow::Result;
use osfetch_core::pipeline::Pipeline;
use std::path::Path;

use super::output::print_freshness;

pub fn run_compare(pipeline: &Pipeline, target: &str, path: &Path) -> Result<()> {
    let resource = pipeline.resolve(target)?;
    let (remote, newest, freshness) = pipeline.compare_local(&resource, path)?;
    print_freshness(&remote, newest, pipeline.config().date_zone, &freshness);
    Ok(())
}
