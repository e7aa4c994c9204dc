//! Runtime context for static analyzer orchestration.
//!
//! The crate resolves everything the orchestration layer needs to know
//! about the installed package before any analyzer runs: analyzer binary
//! locations (bundled, overridden, or found on the PATH), the
//! environment-variable names used by the build-log capture library, the
//! package version metadata, and the checker-label directory. All of it is
//! loaded once per process and read-only afterwards.

pub mod config;
pub mod context;
pub mod env;
pub mod errors;
pub mod labels;
pub mod resolve;

// Re-export commonly used types
pub use crate::context::{get_context, Context};
pub use crate::env::{Environment, MapEnv, ProcessEnv};
pub use crate::errors::{ContextError, Result};
pub use crate::labels::CheckerLabels;
pub use crate::resolve::{parse_analyzer_overrides, BinaryResolver};
