//! Specification types for commands, flags and positional arguments.
//!
//! This module defines the declarative data model an application uses to
//! describe its command line. The types carry no behaviour beyond simple
//! lookups and value coercion; parsing and dispatch live in the `cmdkit`
//! crate. Everything here can round-trip through JSON and YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declaration of the help flag appended to every command's flag set.
pub const HELP_FLAG: &str = "help, h";

/// Declaration of the version flag appended to the application's global flags.
pub const VERSION_FLAG: &str = "version";

/// Kind of value a flag carries.
///
/// # Examples
///
/// ```
/// use cmdkit_core::{FlagKind, FlagValue};
///
/// assert_eq!(FlagKind::default(), FlagKind::Bool);
/// assert_eq!(FlagKind::Int.zero(), FlagValue::Int(0));
/// assert!(FlagKind::StringList.is_list());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Switch with no value (the default).
    #[default]
    Bool,
    /// Signed integer.
    Int,
    /// 64-bit float.
    Float64,
    /// Free text.
    String,
    /// Text accumulated once per occurrence.
    StringList,
    /// Integers accumulated once per occurrence.
    IntList,
}

impl FlagKind {
    /// Returns the zero value of this kind (`false`, `0`, `0.0`, `""`, `[]`).
    pub fn zero(self) -> FlagValue {
        match self {
            Self::Bool => FlagValue::Bool(false),
            Self::Int => FlagValue::Int(0),
            Self::Float64 => FlagValue::Float64(0.0),
            Self::String => FlagValue::String(String::new()),
            Self::StringList => FlagValue::StringList(Vec::new()),
            Self::IntList => FlagValue::IntList(Vec::new()),
        }
    }

    /// Whether occurrences of a flag of this kind accumulate.
    pub fn is_list(self) -> bool {
        matches!(self, Self::StringList | Self::IntList)
    }

    /// Whether a flag of this kind needs a value token.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Bool)
    }

    /// Short label used in help output and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::StringList => "string_list",
            Self::IntList => "int_list",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed value of a flag.
///
/// Deserialization is untagged so declarations can write defaults as plain
/// scalars or sequences (`default: 3`, `default: [a, b]`); use
/// [`coerce`](FlagValue::coerce) to bring a value to a flag's kind.
///
/// # Examples
///
/// ```
/// use cmdkit_core::{FlagKind, FlagValue};
///
/// let value = FlagValue::from(vec!["a", "b"]);
/// assert_eq!(value.as_text(), "[a b]");
/// assert_eq!(FlagValue::from("42").coerce(FlagKind::Int), Some(FlagValue::Int(42)));
/// assert_eq!(FlagValue::from("x").coerce(FlagKind::Int), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float64(f64),
    String(String),
    IntList(Vec<i64>),
    StringList(Vec<String>),
}

impl FlagValue {
    /// Returns the kind this value belongs to.
    pub fn kind(&self) -> FlagKind {
        match self {
            Self::Bool(_) => FlagKind::Bool,
            Self::Int(_) => FlagKind::Int,
            Self::Float64(_) => FlagKind::Float64,
            Self::String(_) => FlagKind::String,
            Self::StringList(_) => FlagKind::StringList,
            Self::IntList(_) => FlagKind::IntList,
        }
    }

    /// Textual rendering of the value. Lists render as `[a b c]`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float64(x) => x.to_string(),
            Self::String(s) => s.clone(),
            Self::StringList(items) => format!("[{}]", items.join(" ")),
            Self::IntList(items) => {
                let items: Vec<String> = items.iter().map(i64::to_string).collect();
                format!("[{}]", items.join(" "))
            }
        }
    }

    /// Parses `text` as a value of `kind`.
    ///
    /// List kinds produce a one-element list. The error is a short reason
    /// suitable for embedding in a diagnostic.
    pub fn parse(kind: FlagKind, text: &str) -> Result<Self, String> {
        let parsed = match kind {
            FlagKind::Bool => parse_bool(text).map(Self::Bool),
            FlagKind::Int => parse_int(text).map(Self::Int),
            FlagKind::Float64 => parse_float(text).map(Self::Float64),
            FlagKind::String => Some(Self::String(text.to_string())),
            FlagKind::StringList => Some(Self::StringList(vec![text.to_string()])),
            FlagKind::IntList => parse_int(text).map(|n| Self::IntList(vec![n])),
        };
        parsed.ok_or_else(|| "parse error".to_string())
    }

    /// Converts this value to `kind`, or `None` when it does not fit.
    pub fn coerce(&self, kind: FlagKind) -> Option<Self> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        match (self, kind) {
            (Self::IntList(items), FlagKind::StringList) => Some(Self::StringList(
                items.iter().map(i64::to_string).collect(),
            )),
            (Self::StringList(items), FlagKind::IntList) => items
                .iter()
                .map(|item| parse_int(item))
                .collect::<Option<Vec<_>>>()
                .map(Self::IntList),
            (Self::StringList(_) | Self::IntList(_), _) => None,
            (scalar, kind) => Self::parse(kind, &scalar.as_text()).ok(),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<Vec<&str>> for FlagValue {
    fn from(value: Vec<&str>) -> Self {
        Self::StringList(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<i64>> for FlagValue {
    fn from(value: Vec<i64>) -> Self {
        Self::IntList(value)
    }
}

/// Parses a boolean literal (`1 t T true TRUE True 0 f F false FALSE False`).
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a signed integer. `0x`, `0o` and `0b` prefixes select the radix.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(body, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Parses a 64-bit float.
pub fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Declaration of one flag.
///
/// `name` holds every alias of the flag separated by commas; the first alias
/// is canonical. Aliases are registered as independent flags that share
/// `kind` and `default`, and are unified after parsing.
///
/// # Examples
///
/// ```
/// use cmdkit_core::{FlagSpec, FlagValue};
///
/// let flag = FlagSpec::int("count, c").with_usage("number of runs").with_default(3);
/// assert_eq!(flag.names(), vec!["count", "c"]);
/// assert_eq!(flag.canonical_name(), "count");
/// assert_eq!(flag.default_value(), FlagValue::Int(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Comma-separated aliases, e.g. `"verbose, v"`.
    pub name: String,
    /// One-line description shown in help.
    #[serde(default)]
    pub usage: String,
    /// Value kind.
    #[serde(default)]
    pub kind: FlagKind,
    /// Value used when the flag is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FlagValue>,
}

impl FlagSpec {
    /// Creates a flag of the given kind with no usage text and a zero default.
    pub fn new(name: &str, kind: FlagKind) -> Self {
        Self {
            name: name.to_string(),
            usage: String::new(),
            kind,
            default: None,
        }
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, FlagKind::Int)
    }

    pub fn float64(name: &str) -> Self {
        Self::new(name, FlagKind::Float64)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub fn string_list(name: &str) -> Self {
        Self::new(name, FlagKind::StringList)
    }

    pub fn int_list(name: &str) -> Self {
        Self::new(name, FlagKind::IntList)
    }

    /// Adds usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<FlagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the trimmed aliases in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.name.split(',').map(str::trim).collect()
    }

    /// Returns the first alias.
    pub fn canonical_name(&self) -> &str {
        self.name.split(',').next().unwrap_or_default().trim()
    }

    /// Whether `alias` is one of this flag's names.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.names().contains(&alias)
    }

    /// The default coerced to this flag's kind, or the kind's zero value.
    pub fn default_value(&self) -> FlagValue {
        self.default
            .as_ref()
            .and_then(|value| value.coerce(self.kind))
            .unwrap_or_else(|| self.kind.zero())
    }
}

/// Declaration of one positional argument.
///
/// Arguments are consumed by position: the first positional token binds to
/// the first declared argument, and so on.
///
/// # Examples
///
/// ```
/// use cmdkit_core::ArgumentSpec;
///
/// let src = ArgumentSpec::required("source").with_description("file to copy");
/// let dest = ArgumentSpec::optional("dest");
/// assert!(!src.optional);
/// assert!(dest.optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Name used by `NamedArg` lookups.
    pub name: String,
    /// Short usage hint.
    #[serde(default)]
    pub usage: String,
    /// Longer description shown in help.
    #[serde(default)]
    pub description: String,
    /// Whether the argument may be omitted.
    #[serde(default)]
    pub optional: bool,
}

impl ArgumentSpec {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: String::new(),
            description: String::new(),
            optional: false,
        }
    }

    pub fn optional(name: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(name)
        }
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Declaration of one command.
///
/// The handler is not part of the declaration; `cmdkit::Command` pairs a
/// `CommandSpec` with its action.
///
/// # Examples
///
/// ```
/// use cmdkit_core::{ArgumentSpec, CommandSpec, FlagSpec};
///
/// let cmd = CommandSpec::new("copy")
///     .with_short_name("cp")
///     .with_argument(ArgumentSpec::required("source"))
///     .with_argument(ArgumentSpec::optional("dest"))
///     .with_flag(FlagSpec::bool("force, f"));
///
/// assert!(cmd.has_name("cp"));
/// assert_eq!(cmd.required_arguments(), 1);
/// assert!(cmd.find_flag("f").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Positional arguments in binding order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
}

impl CommandSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_short_name(mut self, short_name: &str) -> Self {
        self.short_name = Some(short_name.to_string());
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Returns true if `name` is the command's name or short name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name || self.short_name.as_deref() == Some(name)
    }

    /// Number of arguments that must be supplied.
    pub fn required_arguments(&self) -> usize {
        self.arguments.iter().filter(|arg| !arg.optional).count()
    }

    /// Finds the flag declaring `alias`.
    pub fn find_flag(&self, alias: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|flag| flag.has_alias(alias))
    }
}

/// Declaration of a whole application: global flags plus the command table.
///
/// # Examples
///
/// ```
/// use cmdkit_core::{AppSpec, CommandSpec, FlagSpec};
///
/// let app = AppSpec::new("tool")
///     .with_version("1.2.0")
///     .with_flag(FlagSpec::bool("debug, d"))
///     .with_command(CommandSpec::new("build").with_short_name("b"));
///
/// assert_eq!(app.find_command("b").map(|c| c.name.as_str()), Some("build"));
/// assert_eq!(app.command_names(), vec!["build"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Global flags, visible to every command through the parent scope.
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

impl AppSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    /// Finds a command by name or short name.
    pub fn find_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|cmd| cmd.has_name(name))
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|cmd| cmd.name.as_str()).collect()
    }
}
