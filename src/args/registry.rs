//! Flag registry: single source of truth for all flags.

use crate::args::OptionKind;

/// Whether a flag takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagArity {
    /// Boolean flag, no value (e.g., --update, --clean).
    NoValue,
    /// Exactly one value, either as the next token or after `=` on the long form.
    RequiresValue,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Long form (e.g., "--build-arg"). `-C` has none.
    pub long: Option<&'static str>,
    /// Short form (e.g., "-b").
    pub short: Option<&'static str>,
    /// Does it take a value?
    pub arity: FlagArity,
    /// Which option bucket the value lands in.
    pub kind: OptionKind,
    /// Placeholder shown in help text for the value.
    pub value_name: Option<&'static str>,
    /// Human-readable description (for help text).
    pub description: &'static str,
}

static FLAGS: &[FlagDef] = &[
    FlagDef {
        long: None,
        short: Some("-C"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::TargetDir,
        value_name: Some("<dir>"),
        description: "Specify source directory",
    },
    FlagDef {
        long: Some("--arg"),
        short: Some("-a"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::RuntimeArg,
        value_name: Some("<argument>"),
        description: "Pass <argument> to the executing code",
    },
    FlagDef {
        long: Some("--build-arg"),
        short: Some("-b"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::BuildArg,
        value_name: Some("<build argument>"),
        description: "Pass <build argument> to compiler",
    },
    FlagDef {
        long: Some("--include"),
        short: Some("-i"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::Include,
        value_name: Some("<file|path>"),
        description: "Mount local <file|path> in dexec container",
    },
    FlagDef {
        long: Some("--extension"),
        short: Some("-e"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::Extension,
        value_name: Some("<extension>"),
        description: "Override the image used by <extension>",
    },
    FlagDef {
        long: Some("--image"),
        short: Some("-m"),
        arity: FlagArity::RequiresValue,
        kind: OptionKind::Image,
        value_name: Some("<name>"),
        description: "Override the image used by <name>",
    },
    FlagDef {
        long: Some("--update"),
        short: Some("-u"),
        arity: FlagArity::NoValue,
        kind: OptionKind::UpdateFlag,
        value_name: None,
        description: "Force update of image",
    },
    FlagDef {
        long: Some("--clean"),
        short: None,
        arity: FlagArity::NoValue,
        kind: OptionKind::CleanFlag,
        value_name: None,
        description: "Remove all local dexec images",
    },
    FlagDef {
        long: Some("--help"),
        short: Some("-h"),
        arity: FlagArity::NoValue,
        kind: OptionKind::HelpFlag,
        value_name: None,
        description: "Show help",
    },
    FlagDef {
        long: Some("--version"),
        short: Some("-v"),
        arity: FlagArity::NoValue,
        kind: OptionKind::VersionFlag,
        value_name: None,
        description: "Display version info",
    },
];

/// The complete flag registry, in help-text order.
pub fn flag_registry() -> &'static [FlagDef] {
    FLAGS
}

impl FlagDef {
    /// Check if this definition matches the given argument as a standalone token.
    pub fn matches(&self, arg: &str) -> bool {
        self.long == Some(arg) || self.short == Some(arg)
    }

    /// Value of a `--long=value` token. The value must be non-empty.
    pub fn combined_value<'a>(&self, arg: &'a str) -> Option<&'a str> {
        let long = self.long?;
        arg.strip_prefix(long)?
            .strip_prefix('=')
            .filter(|value| !value.is_empty())
    }

    /// Usage column for help text, e.g. `--arg, -a <argument>`.
    pub fn usage(&self) -> String {
        let names: Vec<&str> = [self.long, self.short].into_iter().flatten().collect();
        let mut usage = names.join(", ");
        if let Some(value_name) = self.value_name {
            usage.push(' ');
            usage.push_str(value_name);
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_value_requires_equals_and_value() {
        let arg = flag_registry()
            .iter()
            .find(|d| d.kind == OptionKind::RuntimeArg)
            .unwrap();
        assert_eq!(arg.combined_value("--arg=foo"), Some("foo"));
        assert_eq!(arg.combined_value("--arg=a=b"), Some("a=b"));
        assert_eq!(arg.combined_value("--arg="), None);
        assert_eq!(arg.combined_value("--arg"), None);
        assert_eq!(arg.combined_value("--argument=foo"), None);
    }

    #[test]
    fn target_dir_has_no_combined_form() {
        let dir = flag_registry()
            .iter()
            .find(|d| d.kind == OptionKind::TargetDir)
            .unwrap();
        assert!(dir.matches("-C"));
        assert_eq!(dir.combined_value("-C=foo"), None);
    }

    #[test]
    fn usage_lists_long_short_and_value() {
        let usages: Vec<String> = flag_registry().iter().map(FlagDef::usage).collect();
        assert!(usages.contains(&"--build-arg, -b <build argument>".to_string()));
        assert!(usages.contains(&"-C <dir>".to_string()));
        assert!(usages.contains(&"--clean".to_string()));
    }

    #[test]
    fn every_kind_has_exactly_one_flag() {
        let mut kinds: Vec<OptionKind> = flag_registry().iter().map(|d| d.kind).collect();
        let total = kinds.len();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), total);
    }
}
