//! Command-line handling for dexec.
//!
//! Arguments flow through a small set of pure stages:
//!
//! ```text
//! OS args → Classify (per token) → Parse (option map) → Assemble → ContainerSpec
//! ```
//!
//! Each stage is a plain function over owned or borrowed strings so it can be
//! unit-tested without a container runtime.

mod assembler;
mod classifier;
mod mount;
mod options;
mod parser;
mod pipeline;
mod registry;

pub use assembler::{add_prefix, ArgAssembler};
pub use classifier::{classify, Classified, ParseError};
pub use mount::{extract_basename_and_permission, extract_file_extension};
pub use options::ParsedOptions;
pub use parser::{parse, OptionMap, ParseFailure};
pub use pipeline::build_container_spec;
pub use registry::{flag_registry, FlagArity, FlagDef};

/// What a classified command-line token means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKind {
    /// Placeholder before classification; never produced for a matched token.
    #[default]
    None,
    /// Argument forwarded to the executing program (`-a`).
    RuntimeArg,
    /// Argument forwarded to the compiler (`-b`).
    BuildArg,
    /// Source file to mount and execute.
    Source,
    /// File or directory mounted without being passed to the entrypoint.
    Include,
    /// `repository[:version]` replacing the extension-derived image.
    Image,
    /// Extension forcing the language regardless of the filename.
    Extension,
    /// Directory the sources are relative to (`-C`).
    TargetDir,
    /// Pull the image even when it exists locally.
    UpdateFlag,
    /// Remove every local dexec image.
    CleanFlag,
    HelpFlag,
    VersionFlag,
}
