//! CLI command implementations.

pub(crate) mod depth;
pub(crate) mod report;
pub(crate) mod signals;
