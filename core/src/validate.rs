//! Command and application validation.
//!
//! Catches authoring mistakes in declarations, such as duplicate flag
//! aliases, clashes with the reserved help/version flags, duplicate argument
//! names and defaults that do not fit their flag's kind, before they surface
//! as confusing dispatch failures.
//!
//! # Examples
//!
//! ```
//! use cmdkit_core::*;
//!
//! let cmd = CommandSpec::new("run").with_flag(FlagSpec::bool("verbose, v"));
//! assert!(validate_command(&cmd).is_empty());
//!
//! // Invalid: `h` is reserved for the help flag
//! let bad = CommandSpec::new("run").with_flag(FlagSpec::bool("host, h"));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{AppSpec, CommandSpec, FlagSpec, HELP_FLAG, VERSION_FLAG};

/// Declaration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A flag declaration contains an empty alias (e.g. `"verbose,"`).
    #[error("flag declaration has an empty alias: {0:?}")]
    EmptyFlagAlias(String),
    /// Two flags in the same scope share an alias.
    #[error("duplicate flag alias in scope: {0}")]
    DuplicateFlagAlias(String),
    /// A flag uses an alias the dispatcher appends itself.
    #[error("flag alias is reserved: {0}")]
    ReservedFlagAlias(String),
    /// The declared default cannot be read as the flag's kind.
    #[error("default for flag {flag} is not a valid {kind}")]
    InvalidDefault { flag: String, kind: String },
    /// Argument name is empty or whitespace-only.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
    /// Two arguments of one command share a name.
    #[error("duplicate argument name: {0}")]
    DuplicateArgument(String),
    /// Two commands share a name or short name.
    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),
}

/// Validates a whole application declaration.
///
/// Checks the global flags (where `help`, `h` and `version` are reserved),
/// command name uniqueness across names and short names, and each command.
///
/// # Examples
///
/// ```
/// use cmdkit_core::*;
///
/// let app = AppSpec::new("tool")
///     .with_command(CommandSpec::new("build").with_short_name("b"))
///     .with_command(CommandSpec::new("bench").with_short_name("b"));
///
/// let errors = validate_app(&app);
/// assert_eq!(errors, vec![ValidationError::DuplicateCommand("b".into())]);
/// ```
pub fn validate_app(app: &AppSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut reserved = reserved_aliases(HELP_FLAG);
    reserved.extend(reserved_aliases(VERSION_FLAG));
    errors.extend(validate_flags(&app.flags, &reserved));

    let mut seen: HashSet<&str> = HashSet::new();
    for cmd in &app.commands {
        let names = std::iter::once(cmd.name.as_str()).chain(cmd.short_name.as_deref());
        for name in names {
            if !name.trim().is_empty() && !seen.insert(name) {
                errors.push(ValidationError::DuplicateCommand(name.to_string()));
            }
        }
        errors.extend(validate_command(cmd));
    }

    errors
}

/// Validates one command declaration.
///
/// # Examples
///
/// ```
/// use cmdkit_core::*;
///
/// let cmd = CommandSpec::new("copy")
///     .with_argument(ArgumentSpec::required("src"))
///     .with_argument(ArgumentSpec::required("src"));
/// assert_eq!(
///     validate_command(&cmd),
///     vec![ValidationError::DuplicateArgument("src".into())]
/// );
/// ```
pub fn validate_command(cmd: &CommandSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if cmd.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
    }

    errors.extend(validate_flags(&cmd.flags, &reserved_aliases(HELP_FLAG)));

    let mut seen = HashSet::new();
    for arg in &cmd.arguments {
        let name = arg.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyArgumentName);
        } else if !seen.insert(name) {
            errors.push(ValidationError::DuplicateArgument(name.to_string()));
        }
    }

    errors
}

fn reserved_aliases(declaration: &str) -> HashSet<String> {
    declaration.split(',').map(|s| s.trim().to_string()).collect()
}

fn validate_flags(flags: &[FlagSpec], reserved: &HashSet<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for flag in flags {
        for alias in flag.names() {
            if alias.is_empty() {
                errors.push(ValidationError::EmptyFlagAlias(flag.name.clone()));
                continue;
            }
            if reserved.contains(alias) {
                errors.push(ValidationError::ReservedFlagAlias(alias.to_string()));
                continue;
            }
            if !seen.insert(alias) {
                errors.push(ValidationError::DuplicateFlagAlias(alias.to_string()));
            }
        }

        if let Some(default) = &flag.default {
            if default.coerce(flag.kind).is_none() {
                errors.push(ValidationError::InvalidDefault {
                    flag: flag.canonical_name().to_string(),
                    kind: flag.kind.to_string(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::{ArgumentSpec, FlagKind};

    use super::*;

    #[test]
    fn test_validate_command_rejects_duplicate_alias() {
        let cmd = CommandSpec::new("run")
            .with_flag(FlagSpec::bool("verbose, v"))
            .with_flag(FlagSpec::string("version, v"));

        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::DuplicateFlagAlias("v".to_string())]
        );
    }

    #[test]
    fn test_validate_command_rejects_reserved_help() {
        let cmd = CommandSpec::new("run").with_flag(FlagSpec::bool("help"));

        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::ReservedFlagAlias("help".to_string())]
        );
    }

    #[test]
    fn test_version_is_only_reserved_at_app_scope() {
        let cmd = CommandSpec::new("run").with_flag(FlagSpec::bool("version"));
        assert!(validate_command(&cmd).is_empty());

        let app = AppSpec::new("tool").with_flag(FlagSpec::bool("version"));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::ReservedFlagAlias("version".to_string())]
        );
    }

    #[test]
    fn test_validate_command_rejects_bad_default() {
        let cmd = CommandSpec::new("run").with_flag(FlagSpec::int("count").with_default("many"));

        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::InvalidDefault {
                flag: "count".to_string(),
                kind: FlagKind::Int.to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_command_rejects_empty_names() {
        let cmd = CommandSpec::new(" ")
            .with_flag(FlagSpec::bool("quiet,"))
            .with_argument(ArgumentSpec::required(""));

        assert_eq!(
            validate_command(&cmd),
            vec![
                ValidationError::EmptyCommandName,
                ValidationError::EmptyFlagAlias("quiet,".to_string()),
                ValidationError::EmptyArgumentName,
            ]
        );
    }

    #[test]
    fn test_validate_app_accepts_valid_app() {
        let app = AppSpec::new("tool")
            .with_flag(FlagSpec::bool("debug, d"))
            .with_command(
                CommandSpec::new("build")
                    .with_short_name("b")
                    .with_argument(ArgumentSpec::required("target"))
                    .with_flag(FlagSpec::string_list("feature, f")),
            )
            .with_command(CommandSpec::new("test").with_short_name("t"));

        assert!(validate_app(&app).is_empty());
    }
}
