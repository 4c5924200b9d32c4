//! CLI command handlers, one file per command.

mod compare;
mod download;
mod extract;
mod files;
mod get;
mod output;
mod updated;

pub use compare::run_compare;
pub use download::run_download;
pub use extract::run_extract;
pub use files::run_files;
pub use get::run_get;
pub use updated::run_updated;
