//! Producers of compiler output.
//!
//! - [`GoToolchain`] runs `go build` with inlining diagnostics enabled.
//! - [`LogReplay`] re-reads output captured earlier (a file or in-memory text).

pub mod go;
pub mod replay;

pub use go::GoToolchain;
pub use replay::LogReplay;
