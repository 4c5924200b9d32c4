//! Shared console output: progress line, directory listing, freshness summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use osfetch_core::freshness::{DateZone, Freshness};
use osfetch_core::progress::Progress;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Text of one progress update: megabytes, percentage and block count when the
/// length is known, megabytes alone otherwise.
pub fn progress_text(p: Progress, block_size: usize) -> String {
    let done_mb = p.bytes_written as f64 / 1e6;
    match (p.total, p.fraction(), p.total_blocks(block_size)) {
        (Some(total), Some(frac), Some(blocks)) => {
            let block = block_size.max(1) as u64;
            format!(
                "block {}/{}  {:.1} / {:.1} MB ({:.1}%)",
                p.bytes_written.div_ceil(block).min(blocks),
                blocks,
                done_mb,
                total as f64 / 1e6,
                frac * 100.0
            )
        }
        _ => format!("{:.1} MB", done_mb),
    }
}

/// Rate-limited progress line on stderr.
pub struct ProgressLine {
    block_size: usize,
    last_print: Option<Instant>,
    printed: bool,
}

impl ProgressLine {
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            last_print: None,
            printed: false,
        }
    }

    pub fn update(&mut self, p: Progress) {
        let now = Instant::now();
        let done = p.total.is_some_and(|t| p.bytes_written >= t);
        if let Some(last) = self.last_print {
            if now.duration_since(last) < PROGRESS_INTERVAL && !done {
                return;
            }
        }
        let line = format!("\r  {}  ", progress_text(p, self.block_size));
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
        self.last_print = Some(now);
        self.printed = true;
    }

    pub fn finish(&mut self) {
        if self.printed {
            eprintln!();
            self.printed = false;
        }
    }
}

pub fn print_file_size(path: &Path) -> Result<()> {
    let len = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    println!("file size: {}KB", len as f64 / 1000.0);
    Ok(())
}

pub fn print_dir_contents(dir: &Path) -> Result<()> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    println!("Directory contents:");
    for name in names {
        println!("- {}", name);
    }
    Ok(())
}

/// `YYYY-MM-DD` of `t` in the zone remote dates are read in.
pub fn local_date(t: SystemTime, zone: DateZone) -> String {
    match zone {
        DateZone::Local => DateTime::<Local>::from(t).format("%Y-%m-%d").to_string(),
        DateZone::Utc => DateTime::<Utc>::from(t).format("%Y-%m-%d").to_string(),
    }
}

pub fn print_freshness(remote: &str, newest: SystemTime, zone: DateZone, f: &Freshness) {
    println!("OSF file date modified: {}", remote);
    println!("Newest local object date modified: {}", local_date(newest, zone));
    println!("{} file is {} seconds newer!", f.newer(), f.magnitude_secs());
}
