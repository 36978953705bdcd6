//! Shared helpers used by the pipelines and the dev server.

pub mod exec;
pub mod fs;
pub mod hash;
pub mod mime;
pub mod path;
