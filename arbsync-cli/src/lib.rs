//! CLI library for testing purposes

pub mod check;
pub mod config;
pub mod console;
pub mod create_cache;
pub mod decode;
pub mod exclude;
pub mod google;
pub mod keys;
pub mod preview;
pub mod project;
pub mod translate;
pub mod validation;

pub use config::{Config, Workspace};
pub use project::Project;
