//! `osfetch files` – show the filename -> key table.

use osfetch_core::pipeline::Pipeline;

pub fn run_files(pipeline: &Pipeline) {
    let files: Vec<(&str, &str)> = pipeline.catalog().files().collect();
    if files.is_empty() {
        println!("No files configured.");
        return;
    }
    let width = files.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    println!("{:<width$}  {}", "FILE", "KEY", width = width);
    for (name, key) in files {
        println!("{:<width$}  {}", name, key, width = width);
    }
}
