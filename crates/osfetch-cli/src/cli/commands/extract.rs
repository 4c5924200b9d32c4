//! `osfetch extract <archive>` – unpack a tarball and delete it.

use anyhow::Result;
use osfetch_core::extract;
use std::path::Path;

use super::output::print_dir_contents;

pub fn run_extract(archive: &Path) -> Result<()> {
    let out = extract::extract_archive(archive)?;
    println!(
        "extracted {} entries into {}",
        out.entries,
        out.dest_dir.display()
    );
    if out.extracted_dir.is_dir() {
        print_dir_contents(&out.extracted_dir)?;
    }
    Ok(())
}
