//! Execution context handed to command actions.
//!
//! A [`Context`] exposes typed, infallible lookups over the resolved flags
//! of the running command (local scope) and of the application (global
//! scope), plus the bound positional arguments. Lookups never fail: a
//! missing flag, or a value that does not coerce to the requested type,
//! yields that type's zero value.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::ops::Deref;

use cmdkit_core::{FlagKind, FlagValue, parse_bool, parse_float, parse_int};

use crate::binder::BoundArguments;
use crate::flagset::FlagSet;

/// Read-only view of one command invocation.
///
/// # Examples
///
/// ```
/// use cmdkit::{BoundArguments, Context, FlagSet, Args};
/// use cmdkit_core::FlagSpec;
///
/// let mut flags = FlagSet::from_specs("serve", &[FlagSpec::int("port")]).unwrap();
/// flags.parse(["-port=8080"]);
///
/// let ctx = Context::new("serve", flags, None, BoundArguments::default(), Args::default());
/// assert_eq!(ctx.int("port"), 8080);
/// assert_eq!(ctx.string("port"), "8080");
/// assert_eq!(ctx.int("missing"), 0);
/// assert!(!ctx.global_bool("debug"));
/// ```
#[derive(Debug)]
pub struct Context<'a> {
    command: &'a str,
    flags: FlagSet,
    global: Option<&'a FlagSet>,
    arguments: BoundArguments,
    args: Args,
    set_flags: OnceCell<BTreeSet<String>>,
}

impl<'a> Context<'a> {
    pub fn new(
        command: &'a str,
        flags: FlagSet,
        global: Option<&'a FlagSet>,
        arguments: BoundArguments,
        args: Args,
    ) -> Self {
        Self {
            command,
            flags,
            global,
            arguments,
            args,
            set_flags: OnceCell::new(),
        }
    }

    /// Name of the command being run.
    pub fn command_name(&self) -> &str {
        self.command
    }

    pub fn int(&self, name: &str) -> i64 {
        lookup_int(Some(&self.flags), name)
    }

    pub fn float64(&self, name: &str) -> f64 {
        lookup_float64(Some(&self.flags), name)
    }

    pub fn bool(&self, name: &str) -> bool {
        lookup_bool(Some(&self.flags), name)
    }

    pub fn string(&self, name: &str) -> String {
        lookup_string(Some(&self.flags), name)
    }

    pub fn string_list(&self, name: &str) -> Vec<String> {
        lookup_string_list(Some(&self.flags), name)
    }

    pub fn int_list(&self, name: &str) -> Vec<i64> {
        lookup_int_list(Some(&self.flags), name)
    }

    pub fn global_int(&self, name: &str) -> i64 {
        lookup_int(self.global, name)
    }

    pub fn global_float64(&self, name: &str) -> f64 {
        lookup_float64(self.global, name)
    }

    pub fn global_bool(&self, name: &str) -> bool {
        lookup_bool(self.global, name)
    }

    pub fn global_string(&self, name: &str) -> String {
        lookup_string(self.global, name)
    }

    pub fn global_string_list(&self, name: &str) -> Vec<String> {
        lookup_string_list(self.global, name)
    }

    pub fn global_int_list(&self, name: &str) -> Vec<i64> {
        lookup_int_list(self.global, name)
    }

    /// Whether the local flag `name` was given on the command line.
    ///
    /// The set of given flags is computed on first call and reused.
    pub fn is_set(&self, name: &str) -> bool {
        self.set_flags
            .get_or_init(|| self.flags.set_flags().map(String::from).collect())
            .contains(name)
    }

    /// Value bound to the declared argument `name`, or `""`.
    pub fn named_arg(&self, name: &str) -> &str {
        self.arguments.get(name).unwrap_or_default()
    }

    pub fn arguments(&self) -> &BoundArguments {
        &self.arguments
    }

    /// Every positional token of the invocation, bound or not, in entry order.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Local flag table.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Global flag table, when the command runs inside an application.
    pub fn global_flags(&self) -> Option<&FlagSet> {
        self.global
    }
}

/// Positional tokens of an invocation.
///
/// # Examples
///
/// ```
/// use cmdkit::Args;
///
/// let args = Args::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
/// assert_eq!(args.first(), Some("a"));
/// assert_eq!(args.get(2), Some("c"));
/// assert_eq!(args.get(3), None);
/// assert_eq!(args.tail(), ["b", "c"]);
/// assert!(args.present());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<String>);

impl Args {
    pub fn get(&self, n: usize) -> Option<&str> {
        self.0.get(n).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    /// Everything after the first token.
    pub fn tail(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn present(&self) -> bool {
        !self.0.is_empty()
    }
}

impl From<Vec<String>> for Args {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl Deref for Args {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn lookup(set: Option<&FlagSet>, name: &str) -> Option<String> {
    set.and_then(|set| set.lookup(name)).map(FlagValue::as_text)
}

fn lookup_int(set: Option<&FlagSet>, name: &str) -> i64 {
    lookup(set, name)
        .and_then(|text| parse_int(&text))
        .unwrap_or(0)
}

fn lookup_float64(set: Option<&FlagSet>, name: &str) -> f64 {
    lookup(set, name)
        .and_then(|text| parse_float(&text))
        .unwrap_or(0.0)
}

fn lookup_bool(set: Option<&FlagSet>, name: &str) -> bool {
    lookup(set, name)
        .and_then(|text| parse_bool(&text))
        .unwrap_or(false)
}

fn lookup_string(set: Option<&FlagSet>, name: &str) -> String {
    lookup(set, name).unwrap_or_default()
}

fn lookup_string_list(set: Option<&FlagSet>, name: &str) -> Vec<String> {
    match set
        .and_then(|set| set.lookup(name))
        .and_then(|value| value.coerce(FlagKind::StringList))
    {
        Some(FlagValue::StringList(items)) => items,
        _ => Vec::new(),
    }
}

fn lookup_int_list(set: Option<&FlagSet>, name: &str) -> Vec<i64> {
    match set
        .and_then(|set| set.lookup(name))
        .and_then(|value| value.coerce(FlagKind::IntList))
    {
        Some(FlagValue::IntList(items)) => items,
        _ => Vec::new(),
    }
}
