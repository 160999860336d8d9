//! Pipeline: ties the argument stages to a ready-to-create container.

use std::path::Path;

use crate::args::assembler::ArgAssembler;
use crate::args::{OptionKind, ParsedOptions};
use crate::container::{BindSet, ContainerSpec};
use crate::image::ContainerImage;

/// Build the container for a resolved invocation.
///
/// # Arguments
///
/// * `options` - Parsed options, with the stdin source already injected if any
/// * `image` - The resolved image
/// * `host_dir` - Absolute directory sources and includes are relative to
/// * `tty` - Whether to allocate a pseudo-terminal
pub fn build_container_spec(
    options: &ParsedOptions,
    image: &ContainerImage,
    host_dir: &Path,
    tty: bool,
) -> ContainerSpec {
    let command = ArgAssembler::new()
        .with_sources(options.values(OptionKind::Source))
        .with_build_args(options.values(OptionKind::BuildArg))
        .with_runtime_args(options.values(OptionKind::RuntimeArg))
        .build();

    let binds = BindSet::new(host_dir)
        .with_sources(options.values(OptionKind::Source))
        .with_includes(options.values(OptionKind::Include))
        .build();

    ContainerSpec {
        image: image.reference(),
        command,
        binds,
        tty,
    }
}
