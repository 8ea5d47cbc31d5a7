// library crate for gridfilter
// exposes the filter units and the CLI needed by auxiliary binaries (e.g., generate-man)

pub mod cli;
pub mod config;
pub mod filters;
