//! Argument assembler: the entrypoint command handed to the container.

use crate::args::mount::extract_basename_and_permission;

/// Insert `prefix` before every value: `["x", "y"]` → `["-a", "x", "-a", "y"]`.
pub fn add_prefix(values: &[String], prefix: &str) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| [prefix.to_string(), value.clone()])
        .collect()
}

/// Builder for the container entrypoint arguments.
///
/// The dexec images expect sources first, then `-b` build arguments, then
/// `-a` runtime arguments. The builder enforces nothing about call order;
/// [`crate::args::build_container_spec`] calls it in that sequence.
#[derive(Debug, Clone, Default)]
pub struct ArgAssembler {
    args: Vec<String>,
}

impl ArgAssembler {
    /// Start with an empty arg list.
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Source paths with their permission suffixes removed.
    pub fn with_sources(mut self, sources: &[String]) -> Self {
        self.args.extend(
            sources
                .iter()
                .map(|s| extract_basename_and_permission(s).0.to_string()),
        );
        self
    }

    pub fn with_build_args(mut self, build_args: &[String]) -> Self {
        self.args.extend(add_prefix(build_args, "-b"));
        self
    }

    pub fn with_runtime_args(mut self, runtime_args: &[String]) -> Self {
        self.args.extend(add_prefix(runtime_args, "-a"));
        self
    }

    /// Build the final argument list.
    pub fn build(self) -> Vec<String> {
        self.args
    }
}
