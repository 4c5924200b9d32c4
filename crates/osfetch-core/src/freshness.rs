//! Remote-vs-local freshness check.
//!
//! The remote side only has a calendar date, which is placed at midnight; the
//! local side uses full-precision modification times. A file touched the same
//! day the remote copy was updated therefore always reads as newer locally.

use crate::error::{OsfError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Zone in which a remote calendar date is placed at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateZone {
    /// The machine's local zone (how a naive date is usually read).
    #[default]
    Local,
    Utc,
}

/// Which copy was modified more recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Remote,
    Local,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Remote => f.write_str("Remote"),
            Side::Local => f.write_str("Local"),
        }
    }
}

/// Both timestamps of a comparison, in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Freshness {
    pub remote_secs: f64,
    pub local_secs: f64,
}

impl Freshness {
    /// Signed difference, remote minus local.
    pub fn difference_secs(&self) -> f64 {
        self.remote_secs - self.local_secs
    }

    /// Remote only when strictly newer; a tie reads as Local.
    pub fn newer(&self) -> Side {
        if self.difference_secs() > 0.0 {
            Side::Remote
        } else {
            Side::Local
        }
    }

    pub fn magnitude_secs(&self) -> f64 {
        self.difference_secs().abs()
    }
}

/// Seconds since the Unix epoch, negative for times before it.
pub fn unix_secs(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Newest modification time under `path`.
///
/// For a directory this is the maximum over its direct entries (not recursive);
/// for a file, its own mtime. An empty directory is an error, never a zero time.
pub fn newest_mtime(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path).map_err(|e| OsfError::io(path, e))?;
    if !meta.is_dir() {
        return meta.modified().map_err(|e| OsfError::io(path, e));
    }

    let mut newest: Option<SystemTime> = None;
    for entry in fs::read_dir(path).map_err(|e| OsfError::io(path, e))? {
        let entry = entry.map_err(|e| OsfError::io(path, e))?;
        let entry_path = entry.path();
        let modified = fs::metadata(&entry_path)
            .and_then(|m| m.modified())
            .map_err(|e| OsfError::io(&entry_path, e))?;
        newest = Some(match newest {
            Some(n) => n.max(modified),
            None => modified,
        });
    }
    newest.ok_or_else(|| OsfError::EmptyDirectory {
        path: path.to_path_buf(),
    })
}

/// Timestamp of midnight on the `YYYY-MM-DD` day `date`, in `zone`.
pub fn remote_timestamp(date: &str, zone: DateZone) -> Result<f64> {
    let day =
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| OsfError::InvalidDate {
            value: date.to_string(),
            source: e,
        })?;
    let midnight = day.and_time(NaiveTime::MIN);
    let secs = match zone {
        DateZone::Utc => Utc.from_utc_datetime(&midnight).timestamp(),
        DateZone::Local => local_midnight(&midnight),
    };
    Ok(secs as f64)
}

fn local_midnight(midnight: &NaiveDateTime) -> i64 {
    match Local.from_local_datetime(midnight).earliest() {
        Some(t) => t.timestamp(),
        // Midnight skipped by a DST jump: shift by the offset in force at that instant.
        None => {
            let offset = Local.offset_from_utc_datetime(midnight).local_minus_utc();
            Utc.from_utc_datetime(midnight).timestamp() - i64::from(offset)
        }
    }
}

/// Compares the remote `Updated` date with the newest local modification time.
pub fn compare(remote_date: &str, local_newest: SystemTime, zone: DateZone) -> Result<Freshness> {
    let freshness = Freshness {
        remote_secs: remote_timestamp(remote_date, zone)?,
        local_secs: unix_secs(local_newest),
    };
    tracing::debug!(
        remote = freshness.remote_secs,
        local = freshness.local_secs,
        "freshness compared"
    );
    Ok(freshness)
}
