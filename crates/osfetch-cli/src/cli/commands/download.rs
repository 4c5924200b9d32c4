//! `osfetch download <target>` – fetch only.

use anyhow::Result;
use osfetch_core::pipeline::Pipeline;
use std::path::PathBuf;

use super::output::{print_file_size, ProgressLine};

pub fn run_download(pipeline: &Pipeline, target: &str, output: Option<PathBuf>) -> Result<()> {
    let resource = pipeline.resolve(target)?;
    let dest = output.unwrap_or_else(|| PathBuf::from(".").join(resource.local_name()));
    let mut progress = ProgressLine::new(pipeline.config().block_size_bytes);
    let result = pipeline.download(&resource, &dest, &mut |p| progress.update(p));
    progress.finish();
    result?;
    print_file_size(&dest)?;
    Ok(())
}
