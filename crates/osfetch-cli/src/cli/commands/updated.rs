//! `osfetch updated <target>` – print the remote date modified.

use anyhow::Result;
use osfetch_core::pipeline::Pipeline;

pub fn run_updated(pipeline: &Pipeline, target: &str) -> Result<()> {
    let resource = pipeline.resolve(target)?;
    let date = pipeline.remote_updated(&resource)?;
    println!("OSF file date modified: {}", date);
    Ok(())
}
