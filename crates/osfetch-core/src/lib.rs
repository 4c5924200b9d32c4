pub mod config;
pub mod error;
pub mod logging;

pub mod extract;
pub mod fetch;
pub mod freshness;
pub mod http;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod resource;

pub use error::{OsfError, Result};
