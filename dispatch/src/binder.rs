//! Token classification and positional binding.
//!
//! A raw invocation mixes flags and positionals in any order
//! (`cmd posA -x=1 posB`). [`classify`] walks the tokens once and hands each
//! one to exactly one segment: the flag segment goes to the flag engine, the
//! positional segment is bound to the command's declared arguments by
//! [`BoundArguments::bind`].

use cmdkit_core::ArgumentSpec;
use tracing::debug;

use crate::error::UsageError;
use crate::flagset::FlagSet;

/// Tokens of one invocation split by role, each in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Flag tokens plus the separate value tokens they consume.
    pub flags: Vec<String>,
    /// Everything else.
    pub positionals: Vec<String>,
}

/// Splits `invocation[1..]` into flag and positional segments.
///
/// Token 0 is the command name and is skipped. A token is a flag when it
/// starts with `-` and is longer than one character. A flag registered in
/// `flags` as value-taking and written without `=value` also claims the next
/// token. `--` ends flag recognition: it is dropped and every later token is
/// positional.
///
/// # Examples
///
/// ```
/// use cmdkit::{FlagSet, classify};
/// use cmdkit_core::FlagSpec;
///
/// let flags = FlagSet::from_specs("cp", &[
///     FlagSpec::string("mode, m"),
///     FlagSpec::bool("force"),
/// ]).unwrap();
/// let tokens: Vec<String> = ["cp", "a", "-m", "0644", "b", "-force", "--", "-c"]
///     .iter().map(|s| s.to_string()).collect();
///
/// let segments = classify(&tokens, &flags);
/// assert_eq!(segments.flags, ["-m", "0644", "-force"]);
/// assert_eq!(segments.positionals, ["a", "b", "-c"]);
/// ```
pub fn classify(invocation: &[String], flags: &FlagSet) -> Segments {
    let mut segments = Segments::default();
    let mut tokens = invocation.iter().skip(1);

    while let Some(token) = tokens.next() {
        if token == "--" {
            segments.positionals.extend(tokens.by_ref().cloned());
            break;
        }
        if !is_flag_token(token) {
            segments.positionals.push(token.clone());
            continue;
        }
        segments.flags.push(token.clone());
        if claims_next_token(token, flags) {
            if let Some(value) = tokens.next() {
                segments.flags.push(value.clone());
            }
        }
    }

    debug!(
        flags = ?segments.flags,
        positionals = ?segments.positionals,
        "Classified invocation tokens"
    );
    segments
}

fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn claims_next_token(token: &str, flags: &FlagSet) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    let body = body.strip_prefix('-').unwrap_or(body);
    if body.contains('=') {
        return false;
    }
    flags.kind(body).is_some_and(|kind| kind.takes_value())
}

/// Argument name to value mapping for one invocation, in declaration order.
///
/// # Examples
///
/// ```
/// use cmdkit::BoundArguments;
/// use cmdkit_core::ArgumentSpec;
///
/// let specs = [ArgumentSpec::required("src"), ArgumentSpec::optional("dest")];
/// let tokens = vec!["a.txt".to_string()];
///
/// let bound = BoundArguments::bind(&tokens, &specs);
/// assert_eq!(bound.get("src"), Some("a.txt"));
/// assert_eq!(bound.get("dest"), None);
/// assert!(bound.check_arity(&specs).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    values: Vec<(String, String)>,
}

impl BoundArguments {
    /// Binds positional tokens to `specs` by position.
    ///
    /// Tokens beyond the last declared argument are left unbound; they stay
    /// visible through the context's leftover args.
    pub fn bind(positionals: &[String], specs: &[ArgumentSpec]) -> Self {
        let values: Vec<(String, String)> = specs
            .iter()
            .zip(positionals)
            .map(|(spec, token)| (spec.name.clone(), token.clone()))
            .collect();

        if positionals.len() > specs.len() {
            debug!(
                declared = specs.len(),
                excess = positionals.len() - specs.len(),
                "Positional tokens beyond declared arguments left unbound"
            );
        }
        debug!(bound = ?values, "Bound positional arguments");

        Self { values }
    }

    /// Fails when fewer arguments were bound than `specs` requires.
    pub fn check_arity(&self, specs: &[ArgumentSpec]) -> Result<(), UsageError> {
        let required = specs.iter().filter(|spec| !spec.optional).count();
        let got = self.values.len();
        if got < required {
            return Err(UsageError::Arity { required, got });
        }
        Ok(())
    }

    /// Value bound to the argument called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
