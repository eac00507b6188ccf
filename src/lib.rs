//! mull, a terminal reading and publishing client for the Thoughts platform.
//!
//! The crate is a thin library over the binary so the integration tests can
//! drive the application state and storage layer headlessly.

pub mod app;
pub mod config;
pub mod seed;
pub mod storage;
pub mod ui;
pub mod util;
