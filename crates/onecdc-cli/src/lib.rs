//! Shared helpers for the OneCDC command-line tools.

pub mod summary;
