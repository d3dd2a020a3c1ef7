//! Argument resolution and command dispatch for declarative CLIs.
//!
//! Given a [`CommandSpec`](cmdkit_core::CommandSpec) and a raw invocation,
//! this crate separates flags from positionals (in any order), binds
//! positionals to declared arguments, parses flags, unifies flag aliases,
//! and hands a typed [`Context`] to the command's action. Help requests
//! short-circuit; usage problems are reported together through a
//! [`Presenter`].
//!
//! # Main entry points
//!
//! - [`App::run`]: a full argv with global flags, command lookup and built-in help.
//! - [`Command::run`] / [`dispatch`]: one command invocation.
//! - [`FlagSet`], [`classify`], [`BoundArguments`], [`normalize_flags`]:
//!   the individual stages, usable on their own.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use cmdkit::{Command, Terminal};
//! use cmdkit_core::{ArgumentSpec, CommandSpec, FlagSpec};
//!
//! let total = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&total);
//! let cmd = Command::new(
//!     CommandSpec::new("sum")
//!         .with_argument(ArgumentSpec::required("label"))
//!         .with_flag(FlagSpec::int_list("n")),
//!     move |ctx| sink.set(ctx.int_list("n").iter().sum()),
//! );
//!
//! let argv: Vec<String> = ["sum", "-n=1", "totals", "-n", "2", "-n=39"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let mut term = Terminal::plain(Vec::new());
//! cmd.run(&argv, None, &mut term).unwrap();
//! assert_eq!(total.get(), 42);
//! ```

mod app;
mod binder;
mod command;
mod context;
mod error;
mod flagset;
mod help;
mod reconcile;
mod terminal;

pub use app::App;
pub use binder::{BoundArguments, Segments, classify};
pub use command::{Action, Command, Outcome, dispatch};
pub use context::{Args, Context};
pub use error::{DispatchError, FlagError, UsageError};
pub use flagset::FlagSet;
pub use help::{render_app_help, render_command_help, render_version};
pub use reconcile::normalize_flags;
pub use terminal::{Ansi, Presenter, Terminal, error_box, paint};
