//! Declarative specification types for command-line applications.
//!
//! This crate defines the data model that the `cmdkit` dispatch engine
//! consumes:
//!
//! - [`FlagSpec`]: a flag with one or more comma-separated aliases, a
//!   [`FlagKind`] and an optional default [`FlagValue`].
//! - [`ArgumentSpec`]: a named positional argument, required or optional.
//! - [`CommandSpec`]: a command with ordered arguments and local flags.
//! - [`AppSpec`]: global flags plus the command table.
//!
//! Validation ([`validate_command`], [`validate_app`]) catches declaration
//! bugs such as duplicate aliases or clashes with the reserved help flag.
//! Declarations can also be loaded from YAML or JSON ([`AppSpec::load`]).
//!
//! # Example
//!
//! ```
//! use cmdkit_core::*;
//!
//! let app = AppSpec::new("tool")
//!     .with_version("0.3.0")
//!     .with_flag(FlagSpec::bool("debug, d").with_usage("enable debug output"))
//!     .with_command(
//!         CommandSpec::new("greet")
//!             .with_argument(ArgumentSpec::required("name"))
//!             .with_flag(FlagSpec::int("times, t").with_default(1)),
//!     );
//!
//! assert!(app.find_command("greet").is_some());
//! assert!(validate_app(&app).is_empty());
//! ```

mod config;
mod types;
mod validate;

pub use config::ConfigError;
pub use types::*;
pub use validate::{ValidationError, validate_app, validate_command};
