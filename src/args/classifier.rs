//! Argument classifier: one raw token (plus lookahead) → option kind and value.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::args::registry::{FlagArity, FlagDef};
use crate::args::OptionKind;

/// Anything not starting with `-` or `_` that has an extension.
static SOURCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^-_].*\..+").expect("source pattern is a valid regex"));

/// Errors produced while turning tokens into options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Missing value for option: {0}")]
    MissingValue(String),
}

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: OptionKind,
    /// Flag value, the source path itself, or empty for boolean flags.
    pub value: String,
    /// How many raw tokens this option spans (1 or 2).
    pub consumed: usize,
}

impl Classified {
    fn new(kind: OptionKind, value: &str, consumed: usize) -> Self {
        Self {
            kind,
            value: value.to_string(),
            consumed,
        }
    }
}

/// Classify `current`, using `lookahead` as the value for standalone value flags.
///
/// Pass an empty `lookahead` when `current` is the last token. A standalone
/// value flag still reports `consumed == 2` in that case; detecting that the
/// value is missing is the parser's job.
///
/// Shapes are tried in order: standalone value flags, `--long=value`,
/// boolean flags, then the source-file pattern.
pub fn classify(
    current: &str,
    lookahead: &str,
    registry: &[FlagDef],
) -> Result<Classified, ParseError> {
    let value_flags = || {
        registry
            .iter()
            .filter(|d| d.arity == FlagArity::RequiresValue)
    };

    if let Some(def) = value_flags().find(|d| d.matches(current)) {
        return Ok(Classified::new(def.kind, lookahead, 2));
    }

    if let Some((def, value)) =
        value_flags().find_map(|d| d.combined_value(current).map(|v| (d, v)))
    {
        return Ok(Classified::new(def.kind, value, 1));
    }

    if let Some(def) = registry
        .iter()
        .filter(|d| d.arity == FlagArity::NoValue)
        .find(|d| d.matches(current))
    {
        return Ok(Classified::new(def.kind, "", 1));
    }

    if SOURCE_PATTERN.is_match(current) {
        return Ok(Classified::new(OptionKind::Source, current, 1));
    }

    Err(ParseError::UnknownOption(current.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::flag_registry;

    #[test]
    fn source_pattern_edges() {
        assert!(SOURCE_PATTERN.is_match("foo.bar"));
        assert!(SOURCE_PATTERN.is_match("bar-foo.groovy"));
        assert!(SOURCE_PATTERN.is_match("dir/main.rs:ro"));
        assert!(!SOURCE_PATTERN.is_match("_hidden.py"));
        assert!(!SOURCE_PATTERN.is_match("-x.py"));
        assert!(!SOURCE_PATTERN.is_match("noextension"));
        assert!(!SOURCE_PATTERN.is_match("trailing."));
    }

    #[test]
    fn value_flag_wins_over_source_shape() {
        // "-a" never looks like a source, but its value may.
        let got = classify("-a", "input.txt", flag_registry()).unwrap();
        assert_eq!(got, Classified::new(OptionKind::RuntimeArg, "input.txt", 2));
    }

    #[test]
    fn old_specify_image_spelling_is_unknown() {
        assert_eq!(
            classify("--specify-image", "foo", flag_registry()),
            Err(ParseError::UnknownOption("--specify-image".into()))
        );
        assert!(classify("-s", "foo", flag_registry()).is_err());
    }

    #[test]
    fn empty_token_is_unknown() {
        assert_eq!(
            classify("", "", flag_registry()),
            Err(ParseError::UnknownOption(String::new()))
        );
    }
}
