//! `osfetch get <target>` – download, extract and freshness-check in one go.

use anyhow::Result;
use osfetch_core::pipeline::{Pipeline, Request};
use std::path::PathBuf;

use super::output::{print_dir_contents, print_freshness, ProgressLine};

pub fn run_get(
    pipeline: &Pipeline,
    target: &str,
    output: Option<PathBuf>,
    extract: bool,
) -> Result<()> {
    let request = Request {
        target: target.to_string(),
        output,
        extract,
    };
    let mut progress = ProgressLine::new(pipeline.config().block_size_bytes);
    let result = pipeline.run(&request, &mut |p| progress.update(p));
    progress.finish();
    let report = result?;

    println!(
        "downloaded {} ({} bytes)",
        report.download_path.display(),
        report.fetch.bytes_written
    );
    if let Some(extracted) = &report.extracted {
        println!(
            "extracted {} entries into {}",
            extracted.entries,
            extracted.dest_dir.display()
        );
        if report.local_path.is_dir() {
            print_dir_contents(&report.local_path)?;
        }
    }
    print_freshness(
        &report.remote_updated,
        report.local_newest,
        pipeline.config().date_zone,
        &report.freshness,
    );
    Ok(())
}
