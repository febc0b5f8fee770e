//! Shared library surface for the route view server and its tests.

pub mod api;
pub mod config;
pub mod state;
