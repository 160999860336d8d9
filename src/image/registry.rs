//! Image registry: which languages dexec knows how to run.

use crate::image::{ContainerImage, RegistryLookupError};

/// Tag used when an override names no version.
pub const DEFAULT_VERSION: &str = "latest";

/// Display name of images built from an override string.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Built-in rows: (display name, extension, repository, version).
const BUILTIN_IMAGES: &[(&str, &str, &str, &str)] = &[
    ("C", "c", "dexec/lang-c", "1.0.2"),
    ("Clojure", "clj", "dexec/lang-clojure", "1.0.1"),
    ("CoffeeScript", "coffee", "dexec/lang-coffee", "1.0.2"),
    ("C++", "cpp", "dexec/lang-cpp", "1.0.2"),
    ("C#", "cs", "dexec/lang-csharp", "1.0.2"),
    ("D", "d", "dexec/lang-d", "1.0.1"),
    ("Erlang", "erl", "dexec/lang-erlang", "1.0.1"),
    ("F#", "fs", "dexec/lang-fsharp", "1.0.2"),
    ("Go", "go", "dexec/lang-go", "1.0.1"),
    ("Groovy", "groovy", "dexec/lang-groovy", "1.0.1"),
    ("Haskell", "hs", "dexec/lang-haskell", "1.0.1"),
    ("Java", "java", "dexec/lang-java", "1.0.3"),
    ("Lisp", "lisp", "dexec/lang-lisp", "1.0.1"),
    ("Lua", "lua", "dexec/lang-lua", "1.0.1"),
    ("JavaScript", "js", "dexec/lang-node", "1.0.2"),
    ("Nim", "nim", "dexec/lang-nim", "1.0.1"),
    ("Objective C", "m", "dexec/lang-objc", "1.0.2"),
    ("OCaml", "ml", "dexec/lang-ocaml", "1.0.1"),
    ("Perl 6", "p6", "dexec/lang-perl6", "1.0.1"),
    ("Perl", "pl", "dexec/lang-perl", "1.0.2"),
    ("PHP", "php", "dexec/lang-php", "1.0.1"),
    ("Python", "py", "dexec/lang-python", "1.0.2"),
    ("R", "r", "dexec/lang-r", "1.0.1"),
    ("Racket", "rkt", "dexec/lang-racket", "1.0.1"),
    ("Ruby", "rb", "dexec/lang-ruby", "1.0.2"),
    ("Rust", "rs", "dexec/lang-rust", "1.0.1"),
    ("Scala", "scala", "dexec/lang-scala", "1.0.1"),
    ("Bash", "sh", "dexec/lang-bash", "1.0.1"),
];

/// Extension-keyed image table.
///
/// Immutable once built; pass it to the resolver explicitly. Rows keep
/// insertion order, which decides ties in [`ImageRegistry::by_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRegistry {
    rows: Vec<ContainerImage>,
}

impl ImageRegistry {
    /// A registry with no rows.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// The built-in language table.
    pub fn builtin() -> Self {
        BUILTIN_IMAGES
            .iter()
            .fold(Self::empty(), |registry, (name, ext, repo, version)| {
                registry.with_image(ContainerImage::new(*name, *ext, *repo, *version))
            })
    }

    /// Add a row, replacing any row with the same extension in place.
    pub fn with_image(mut self, mut image: ContainerImage) -> Self {
        image.extension = image.extension.to_lowercase();
        match self.rows.iter_mut().find(|r| r.extension == image.extension) {
            Some(existing) => *existing = image,
            None => self.rows.push(image),
        }
        self
    }

    pub fn by_extension(&self, extension: &str) -> Result<ContainerImage, RegistryLookupError> {
        let key = extension.to_lowercase();
        self.rows
            .iter()
            .find(|r| r.extension == key)
            .cloned()
            .ok_or_else(|| RegistryLookupError::UnknownExtension(extension.to_string()))
    }

    /// Reverse lookup; the first row with this repository wins.
    pub fn by_repository(&self, repository: &str) -> Result<ContainerImage, RegistryLookupError> {
        self.rows
            .iter()
            .find(|r| r.repository == repository)
            .cloned()
            .ok_or_else(|| RegistryLookupError::UnknownRepository(repository.to_string()))
    }

    /// Build an image from a `repository[:version]` override. Never fails.
    ///
    /// The tag is whatever follows the last `:`, unless that text contains a
    /// `/` (then the colon belongs to a registry host such as
    /// `localhost:5000/img`). A missing or empty tag becomes
    /// [`DEFAULT_VERSION`].
    pub fn by_override(raw: &str, fallback_extension: &str) -> ContainerImage {
        let (repository, version) = match raw.rsplit_once(':') {
            Some((repository, tag)) if !tag.contains('/') && !repository.is_empty() => {
                let version = if tag.is_empty() { DEFAULT_VERSION } else { tag };
                (repository, version)
            }
            _ => (raw, DEFAULT_VERSION),
        };
        ContainerImage::new(UNKNOWN_NAME, fallback_extension, repository, version)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ContainerImage> {
        self.rows.iter()
    }
}

impl Default for ImageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
