//! Error types for flag parsing and command dispatch.

use thiserror::Error;

/// Errors raised by the flag engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The token names a flag that was never defined.
    #[error("flag provided but not defined: -{0}")]
    Unknown(String),

    /// The token looks like a flag but cannot be read as one (`---x`, `-=x`).
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// A value-taking flag was the last token.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// The value does not parse as the flag's kind.
    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// Two declarations registered the same alias.
    #[error("flag redefined: {0}")]
    Redefined(String),

    /// A declaration contains an empty alias.
    #[error("flag name cannot be empty")]
    EmptyName,
}

/// User-input problems held until the execution context is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Fewer positional tokens than required arguments.
    #[error("expected at least {required} argument(s), got {got}")]
    Arity { required: usize, got: usize },

    /// The flag segment could not be parsed.
    #[error(transparent)]
    Flag(#[from] FlagError),
}

/// Errors returned by [`Command::run`](crate::Command::run) and
/// [`App::run`](crate::App::run).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every held usage error of one invocation, flag errors first.
    #[error("incorrect usage: {}", join_usage(.0))]
    Usage(Vec<UsageError>),

    /// Two aliases of one flag were both given.
    #[error("cannot use two forms of the same flag: {first} {second}")]
    AliasConflict { first: String, second: String },

    /// The engine refused a flag declaration.
    #[error("invalid flag declaration: {0}")]
    Definition(#[from] FlagError),

    /// No command matches the requested name.
    #[error("no command named '{0}'")]
    CommandNotFound(String),

    /// Writing help or error output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Returns the held usage errors, if this is a usage failure.
    pub fn usage_errors(&self) -> &[UsageError] {
        match self {
            Self::Usage(errors) => errors,
            _ => &[],
        }
    }
}

fn join_usage(errors: &[UsageError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_lists_every_problem() {
        let err = DispatchError::Usage(vec![
            UsageError::Flag(FlagError::Unknown("x".into())),
            UsageError::Arity {
                required: 2,
                got: 0,
            },
        ]);

        assert_eq!(
            err.to_string(),
            "incorrect usage: flag provided but not defined: -x; expected at least 2 argument(s), got 0"
        );
        assert_eq!(err.usage_errors().len(), 2);
    }

    #[test]
    fn test_invalid_value_message() {
        let err = FlagError::InvalidValue {
            name: "count".into(),
            value: "abc".into(),
            reason: "parse error".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"abc\" for flag -count: parse error"
        );
    }
}
