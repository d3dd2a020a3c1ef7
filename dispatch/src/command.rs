//! Command dispatch.
//!
//! One call to [`dispatch`] runs the whole state machine for a single
//! invocation:
//!
//! 1. classify tokens and bind positionals (arity error held);
//! 2. parse the flag segment (flag errors held);
//! 3. reconcile aliases (conflicts fail immediately);
//! 4. build the [`Context`];
//! 5. show help if `-h`/`-help` was given, else report held errors, else
//!    invoke the action.

use cmdkit_core::{CommandSpec, FlagSpec, HELP_FLAG};
use tracing::debug;

use crate::binder::{BoundArguments, classify};
use crate::context::{Args, Context};
use crate::error::{DispatchError, UsageError};
use crate::flagset::FlagSet;
use crate::reconcile::normalize_flags;
use crate::terminal::Presenter;

/// Handler invoked with the resolved context.
pub type Action = Box<dyn Fn(&Context<'_>)>;

/// How a successful dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran.
    Invoked,
    /// Help was shown instead of running anything.
    HelpShown,
    /// The version banner was shown.
    VersionShown,
}

/// A command declaration paired with its action.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use cmdkit::{Command, Outcome, Terminal};
/// use cmdkit_core::{ArgumentSpec, CommandSpec, FlagSpec};
///
/// let seen = Rc::new(RefCell::new(String::new()));
/// let sink = Rc::clone(&seen);
/// let cmd = Command::new(
///     CommandSpec::new("greet")
///         .with_argument(ArgumentSpec::required("name"))
///         .with_flag(FlagSpec::bool("loud, l")),
///     move |ctx| {
///         let mut greeting = format!("hello {}", ctx.named_arg("name"));
///         if ctx.bool("loud") {
///             greeting = greeting.to_uppercase();
///         }
///         *sink.borrow_mut() = greeting;
///     },
/// );
///
/// let argv: Vec<String> = ["greet", "ada", "-l"].iter().map(|s| s.to_string()).collect();
/// let mut term = Terminal::plain(Vec::new());
/// assert_eq!(cmd.run(&argv, None, &mut term).unwrap(), Outcome::Invoked);
/// assert_eq!(*seen.borrow(), "HELLO ADA");
/// ```
pub struct Command {
    spec: CommandSpec,
    action: Action,
}

impl Command {
    pub fn new(spec: CommandSpec, action: impl Fn(&Context<'_>) + 'static) -> Self {
        Self {
            spec,
            action: Box::new(action),
        }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Dispatches `invocation` (token 0 is the command name) to this command.
    ///
    /// `global` is the application's resolved flag table, exposed through the
    /// context's `global_*` lookups.
    pub fn run(
        &self,
        invocation: &[String],
        global: Option<&FlagSet>,
        out: &mut dyn Presenter,
    ) -> Result<Outcome, DispatchError> {
        dispatch(&self.spec, &*self.action, invocation, global, out)
    }

    pub(crate) fn into_parts(self) -> (CommandSpec, Action) {
        (self.spec, self.action)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Runs one invocation of `spec` and, when nothing short-circuits, `action`.
///
/// # Errors
///
/// - [`DispatchError::Definition`] if the declared flags cannot be
///   registered (duplicate alias, clash with `help`/`h`).
/// - [`DispatchError::AliasConflict`] if two aliases of one flag were given.
/// - [`DispatchError::Usage`] with every flag error followed by the arity
///   error, when no help was requested.
/// - [`DispatchError::Io`] if the presenter fails.
pub fn dispatch(
    spec: &CommandSpec,
    action: &dyn Fn(&Context<'_>),
    invocation: &[String],
    global: Option<&FlagSet>,
    out: &mut dyn Presenter,
) -> Result<Outcome, DispatchError> {
    let mut flag_specs = spec.flags.clone();
    flag_specs.push(FlagSpec::bool(HELP_FLAG).with_usage("show help"));
    let mut flags = FlagSet::from_specs(&spec.name, &flag_specs)?;

    let segments = classify(invocation, &flags);
    let arguments = BoundArguments::bind(&segments.positionals, &spec.arguments);
    let arity = arguments.check_arity(&spec.arguments);

    let mut held: Vec<UsageError> = flags
        .parse(&segments.flags)
        .into_iter()
        .map(UsageError::Flag)
        .collect();
    if let Err(err) = arity {
        held.push(err);
    }

    if let Err(err) = normalize_flags(&flag_specs, &mut flags) {
        debug!(command = %spec.name, error = %err, "Alias reconciliation failed");
        out.error("Invalid Flags", &err.to_string())?;
        out.command_help(spec)?;
        return Err(err);
    }

    let ctx = Context::new(
        &spec.name,
        flags,
        global,
        arguments,
        Args::from(segments.positionals),
    );

    if ctx.bool("h") || ctx.bool("help") {
        debug!(command = %spec.name, "Help requested");
        out.command_help(spec)?;
        return Ok(Outcome::HelpShown);
    }

    if !held.is_empty() {
        debug!(command = %spec.name, errors = held.len(), "Reporting held usage errors");
        for err in &held {
            out.error("Incorrect Usage", &err.to_string())?;
        }
        out.command_help(spec)?;
        return Err(DispatchError::Usage(held));
    }

    debug!(command = %spec.name, "Invoking action");
    action(&ctx);
    Ok(Outcome::Invoked)
}
