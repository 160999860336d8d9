//! Image resolver: parsed options → the image to run.

use crate::args::{extract_file_extension, OptionKind, ParsedOptions};
use crate::image::{ContainerImage, ImageRegistry, ResolutionError};

/// Placeholder extension for an image override resolved before the
/// language is known.
const UNKNOWN_EXTENSION: &str = "unknown";

/// Choose the image for an invocation.
///
/// With sources, the first source's extension picks the row unless an
/// extension override is given; an image override replaces the row's image
/// but keeps that extension. Without sources (code on stdin), an extension
/// or image override is required.
///
/// Only the first value of each override is considered.
pub fn resolve(
    options: &ParsedOptions,
    registry: &ImageRegistry,
) -> Result<ContainerImage, ResolutionError> {
    let extension_override = options.first(OptionKind::Extension);
    let image_override = options.first(OptionKind::Image);

    if let Some(source) = options.first(OptionKind::Source) {
        let extension = extension_override.unwrap_or_else(|| extract_file_extension(source));
        return match image_override {
            Some(image) => Ok(ImageRegistry::by_override(image, extension)),
            None => Ok(registry.by_extension(extension)?),
        };
    }

    match (extension_override, image_override) {
        (Some(extension), _) => Ok(registry.by_extension(extension)?),
        (None, Some(image)) => resolve_stdin_image_override(image, registry),
        (None, None) => Err(ResolutionError::MissingStdinOverride),
    }
}

/// Resolve an image override when no source file names the language.
///
/// The override is split into repository and version, then the repository
/// is looked up in the registry to recover the display name and extension
/// (needed to name the stdin temp file). The override's version is kept.
pub fn resolve_stdin_image_override(
    raw: &str,
    registry: &ImageRegistry,
) -> Result<ContainerImage, ResolutionError> {
    let requested = ImageRegistry::by_override(raw, UNKNOWN_EXTENSION);
    let canonical = registry.by_repository(&requested.repository)?;
    Ok(ContainerImage {
        version: requested.version,
        ..canonical
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OptionMap;

    fn options(pairs: &[(OptionKind, &str)]) -> ParsedOptions {
        let mut map = OptionMap::new();
        for (kind, value) in pairs {
            map.entry(*kind).or_default().push(value.to_string());
        }
        ParsedOptions::from_parts("dexec", map)
    }

    #[test]
    fn only_first_source_matters() {
        let got = resolve(
            &options(&[(OptionKind::Source, "a.py"), (OptionKind::Source, "b.rb")]),
            &ImageRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(got.extension, "py");
    }

    #[test]
    fn permission_suffix_is_ignored_for_extension() {
        let got = resolve(
            &options(&[(OptionKind::Source, "main.go:ro")]),
            &ImageRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(got.repository, "dexec/lang-go");
    }

    #[test]
    fn stdin_override_with_unknown_repository_fails() {
        let err = resolve_stdin_image_override("someone/else:1", &ImageRegistry::builtin())
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Lookup(crate::image::RegistryLookupError::UnknownRepository(
                "someone/else".into()
            ))
        );
    }
}
