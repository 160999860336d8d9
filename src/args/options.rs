//! Parsed invocation: program name plus the option map.

use crate::args::parser::{parse, OptionMap, ParseFailure};
use crate::args::registry::flag_registry;
use crate::args::OptionKind;

const DEFAULT_PROGRAM: &str = "dexec";

/// Options for one invocation.
///
/// Built once from the OS arguments. The only later change is
/// [`ParsedOptions::inject_stdin_source`] in standard-input mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    program: String,
    options: OptionMap,
}

impl ParsedOptions {
    /// Parse the full OS argument vector, program name first.
    pub fn from_os_args(args: &[String]) -> Result<Self, ParseFailure> {
        let (program, rest) = match args.split_first() {
            Some((program, rest)) => (program.clone(), rest),
            None => (DEFAULT_PROGRAM.to_string(), &[][..]),
        };
        let options = parse(rest, flag_registry())?;
        Ok(Self { program, options })
    }

    pub fn from_parts(program: impl Into<String>, options: OptionMap) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    /// The program name as invoked (first OS argument).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// All values of `kind`, in input order. Empty when never given.
    pub fn values(&self, kind: OptionKind) -> &[String] {
        self.options.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of `kind`.
    pub fn first(&self, kind: OptionKind) -> Option<&str> {
        self.values(kind).first().map(String::as_str)
    }

    pub fn has(&self, kind: OptionKind) -> bool {
        !self.values(kind).is_empty()
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    /// Record the temp file holding code read from stdin as the sole source.
    ///
    /// Returns `false` and leaves the options untouched if sources exist.
    pub fn inject_stdin_source(&mut self, filename: impl Into<String>) -> bool {
        if self.has(OptionKind::Source) {
            return false;
        }
        self.options
            .insert(OptionKind::Source, vec![filename.into()]);
        true
    }
}
