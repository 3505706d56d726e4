//! CLI command implementations

pub(crate) mod common;
pub(crate) mod compare;
pub(crate) mod hooks;
pub(crate) mod json;
pub(crate) mod migrate;
pub(crate) mod render;
pub(crate) mod rotate_logs;
