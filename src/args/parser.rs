//! Parser: full token list → per-kind ordered values.

use std::collections::HashMap;

use thiserror::Error;

use crate::args::classifier::{classify, ParseError};
use crate::args::registry::FlagDef;
use crate::args::OptionKind;

/// Values per option kind, each list in left-to-right input order.
pub type OptionMap = HashMap<OptionKind, Vec<String>>;

/// A parse that stopped early.
///
/// `partial` holds everything classified before the offending token, so a
/// caller that prefers to ignore trailing garbage can still use it.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct ParseFailure {
    pub error: ParseError,
    pub partial: OptionMap,
}

/// Parse the arguments that follow the program name.
///
/// Kinds never seen are absent from the map. Parsing stops at the first
/// unknown token, or at a value flag with nothing after it.
pub fn parse(tokens: &[String], registry: &[FlagDef]) -> Result<OptionMap, ParseFailure> {
    let mut options = OptionMap::new();
    let mut cursor = 0;

    while cursor < tokens.len() {
        let current = tokens[cursor].as_str();
        let lookahead = tokens.get(cursor + 1).map(String::as_str).unwrap_or("");

        let classified = match classify(current, lookahead, registry) {
            Ok(classified) => classified,
            Err(error) => {
                return Err(ParseFailure {
                    error,
                    partial: options,
                })
            }
        };

        if tokens.len() - cursor < classified.consumed {
            return Err(ParseFailure {
                error: ParseError::MissingValue(current.to_string()),
                partial: options,
            });
        }

        options
            .entry(classified.kind)
            .or_default()
            .push(classified.value);
        cursor += classified.consumed;
    }

    Ok(options)
}
