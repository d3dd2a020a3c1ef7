//! Flag engine.
//!
//! A [`FlagSet`] holds one typed value per registered alias and parses a
//! token stream into it. Flags are written `-name`, `--name`, `-name=value`
//! or `-name value`. Parsing stops at the first token that is not a flag, at
//! a lone `-`, or after a `--` terminator; whatever remains is available
//! from [`FlagSet::args`].
//!
//! Aliases of one [`FlagSpec`] are registered as independent flags sharing
//! kind and default. Unifying them is the job of
//! [`normalize_flags`](crate::normalize_flags).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use cmdkit_core::{FlagKind, FlagSpec, FlagValue};
use tracing::debug;

use crate::error::FlagError;

#[derive(Debug, Clone)]
struct FlagEntry {
    kind: FlagKind,
    value: FlagValue,
}

/// Parsed flag table for one scope of one invocation.
///
/// Built fresh per dispatch; declarations are never mutated.
///
/// # Examples
///
/// ```
/// use cmdkit::FlagSet;
/// use cmdkit_core::{FlagSpec, FlagValue};
///
/// let mut set = FlagSet::from_specs("run", &[
///     FlagSpec::int("count, c").with_default(1),
///     FlagSpec::string_list("tag"),
/// ]).unwrap();
///
/// let errors = set.parse(["-c=3", "--tag", "a", "-tag=b", "file.txt"]);
/// assert!(errors.is_empty());
/// assert_eq!(set.lookup("c"), Some(&FlagValue::Int(3)));
/// assert_eq!(set.lookup("count"), Some(&FlagValue::Int(1)));
/// assert_eq!(set.lookup("tag"), Some(&FlagValue::from(vec!["a", "b"])));
/// assert_eq!(set.args(), ["file.txt"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, FlagEntry>,
    actual: BTreeSet<String>,
    args: Vec<String>,
}

impl FlagSet {
    /// Creates an empty set. `name` only labels diagnostics.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builds a set registering every alias of every declaration.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Redefined`] when two declarations share an alias
    /// and [`FlagError::EmptyName`] for an empty alias.
    pub fn from_specs(name: &str, specs: &[FlagSpec]) -> Result<Self, FlagError> {
        let mut set = Self::new(name);
        for spec in specs {
            let default = spec.default_value();
            for alias in spec.names() {
                set.define(alias, default.clone())?;
            }
        }
        Ok(set)
    }

    /// Registers one flag whose kind is taken from `default`.
    pub fn define(&mut self, name: &str, default: FlagValue) -> Result<(), FlagError> {
        if name.is_empty() {
            return Err(FlagError::EmptyName);
        }
        if self.flags.contains_key(name) {
            return Err(FlagError::Redefined(name.to_string()));
        }
        self.flags.insert(
            name.to_string(),
            FlagEntry {
                kind: default.kind(),
                value: default,
            },
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value of a flag, default included.
    pub fn lookup(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name).map(|entry| &entry.value)
    }

    pub fn kind(&self, name: &str) -> Option<FlagKind> {
        self.flags.get(name).map(|entry| entry.kind)
    }

    /// Whether the flag was given explicitly (or received a propagated value).
    pub fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    /// Explicitly set flags in lexicographic order.
    pub fn set_flags(&self) -> impl Iterator<Item = &str> {
        self.actual.iter().map(String::as_str)
    }

    /// Every registered flag name in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// Tokens left over once parsing stopped.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Stores `value` for `name` and marks it set.
    ///
    /// The value is coerced to the flag's kind; list values replace the
    /// current list rather than extending it.
    pub fn set(&mut self, name: &str, value: &FlagValue) -> Result<(), FlagError> {
        let entry = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::Unknown(name.to_string()))?;
        let coerced = value
            .coerce(entry.kind)
            .ok_or_else(|| FlagError::InvalidValue {
                name: name.to_string(),
                value: value.as_text(),
                reason: format!("not a valid {}", entry.kind),
            })?;
        entry.value = coerced;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Parses `tokens`, returning every error encountered.
    ///
    /// A malformed or unknown flag does not stop parsing; the engine records
    /// the error and moves on to the next token.
    pub fn parse<I, S>(&mut self, tokens: I) -> Vec<FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queue: VecDeque<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();
        let mut errors = Vec::new();

        while let Some(token) = queue.front() {
            if token.len() < 2 || !token.starts_with('-') {
                break;
            }
            let Some(token) = queue.pop_front() else {
                break;
            };

            let mut body = &token[1..];
            if let Some(rest) = body.strip_prefix('-') {
                if rest.is_empty() {
                    break;
                }
                body = rest;
            }
            if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
                errors.push(FlagError::BadSyntax(token.clone()));
                continue;
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };
            let Some(kind) = self.kind(name) else {
                errors.push(FlagError::Unknown(name.to_string()));
                continue;
            };

            let value = match (kind.takes_value(), inline) {
                (_, Some(value)) => value,
                (false, None) => "true".to_string(),
                (true, None) => match queue.pop_front() {
                    Some(next) => next,
                    None => {
                        errors.push(FlagError::MissingValue(name.to_string()));
                        continue;
                    }
                },
            };

            if let Err(err) = self.apply(name, &value) {
                errors.push(err);
            }
        }

        self.args = queue.into_iter().collect();
        debug!(
            set = %self.name,
            explicit = ?self.actual,
            leftover = self.args.len(),
            errors = errors.len(),
            "Parsed flag tokens"
        );
        errors
    }

    /// Applies one occurrence of a flag. The first occurrence of a list flag
    /// replaces its default; later ones append.
    fn apply(&mut self, name: &str, text: &str) -> Result<(), FlagError> {
        let entry = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::Unknown(name.to_string()))?;
        let parsed = FlagValue::parse(entry.kind, text).map_err(|reason| {
            FlagError::InvalidValue {
                name: name.to_string(),
                value: text.to_string(),
                reason,
            }
        })?;

        let first = self.actual.insert(name.to_string());
        match (&mut entry.value, parsed) {
            (FlagValue::StringList(items), FlagValue::StringList(more)) if !first => {
                items.extend(more);
            }
            (FlagValue::IntList(items), FlagValue::IntList(more)) if !first => {
                items.extend(more);
            }
            (slot, parsed) => *slot = parsed,
        }
        Ok(())
    }
}
