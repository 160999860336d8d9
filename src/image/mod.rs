//! Container images: what to run a given language in.
//!
//! - [`ImageRegistry`]: extension → image table, plus `repository[:version]`
//!   override parsing.
//! - [`resolve`]: picks the image for a parsed invocation.

mod registry;
mod resolver;

pub use registry::{ImageRegistry, DEFAULT_VERSION, UNKNOWN_NAME};
pub use resolver::{resolve, resolve_stdin_image_override};

use std::fmt;

use thiserror::Error;

/// A resolvable execution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    /// Display name (e.g., "Rust"). `"Unknown"` for override-built images.
    pub name: String,
    /// Lowercase file extension, no leading dot.
    pub extension: String,
    /// Image repository without a tag (e.g., "dexec/lang-rust").
    pub repository: String,
    /// Image tag.
    pub version: String,
}

impl ContainerImage {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        repository: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            repository: repository.into(),
            version: version.into(),
        }
    }

    /// Full image reference, `repository:version`.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.version)
    }
}

impl fmt::Display for ContainerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reference(), self.name)
    }
}

/// Registry key not found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryLookupError {
    #[error("No image registered for extension '{0}'")]
    UnknownExtension(String),

    #[error("No image registered for repository '{0}'")]
    UnknownRepository(String),
}

/// Why no image could be chosen for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("stdin requested but no extension or image supplied")]
    MissingStdinOverride,

    #[error(transparent)]
    Lookup(#[from] RegistryLookupError),
}
