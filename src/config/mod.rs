//! Typed models for the JSON files shipped with the installed package.

mod layout;
mod loader;
mod package;
mod version;

pub use layout::{PackageLayout, RuntimeLayout};
pub use loader::load_json_file;
pub use package::{EnvVarRoles, PackageConfig};
pub use version::{GitDescribe, VersionFile, VersionParts};
