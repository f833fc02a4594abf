pub mod archive;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod platform;
pub mod prompt;
pub mod reconcile;
pub mod report;
pub mod snapshot;
pub mod util;
