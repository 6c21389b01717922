//! inlcheck-core
//!
//! Core library for checking that performance-sensitive Go functions are
//! inlined by the compiler.
//!
//! This crate defines the candidate model, the compiler-log classifier, the
//! report builder, the sources that produce compiler logs (a real `go build`
//! or a replayed log file), and the candidates file format.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (the `inlcheck` CLI, `go test` wrappers, etc.).

pub mod config;
pub mod diagnostics;
pub mod model;
pub mod services;

pub use model::{Candidates, Issue};
pub use services::check::{check_inlineable, CheckError, InlineChecker, InliningReport};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
