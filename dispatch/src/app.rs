//! Application bootstrapping: global flags, the command table and the
//! built-in `help` command.

use std::collections::HashMap;

use cmdkit_core::{AppSpec, CommandSpec, FlagSpec, HELP_FLAG, VERSION_FLAG};
use tracing::debug;

use crate::command::{Action, Command, Outcome, dispatch};
use crate::context::Context;
use crate::error::{DispatchError, UsageError};
use crate::flagset::FlagSet;
use crate::reconcile::normalize_flags;
use crate::terminal::Presenter;

/// An application: an [`AppSpec`] plus the actions of its commands.
///
/// Declared commands without an attached action run a no-op.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use cmdkit::{App, Outcome, Terminal};
/// use cmdkit_core::{AppSpec, ArgumentSpec, CommandSpec, FlagSpec};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
///
/// let spec = AppSpec::new("tool")
///     .with_flag(FlagSpec::bool("debug, d"))
///     .with_command(
///         CommandSpec::new("add")
///             .with_short_name("a")
///             .with_argument(ArgumentSpec::required("item")),
///     );
/// let app = App::new(spec).on("add", move |ctx| {
///     sink.borrow_mut().push((ctx.named_arg("item").to_string(), ctx.global_bool("debug")));
/// });
///
/// let mut term = Terminal::plain(Vec::new());
/// let outcome = app.run(["tool", "-d", "a", "milk"], &mut term).unwrap();
/// assert_eq!(outcome, Outcome::Invoked);
/// assert_eq!(*seen.borrow(), vec![("milk".to_string(), true)]);
/// ```
pub struct App {
    spec: AppSpec,
    actions: HashMap<String, Action>,
}

impl App {
    pub fn new(spec: AppSpec) -> Self {
        Self {
            spec,
            actions: HashMap::new(),
        }
    }

    /// Adds a command and its action.
    pub fn with_command(mut self, command: Command) -> Self {
        let (spec, action) = command.into_parts();
        self.actions.insert(spec.name.clone(), action);
        self.spec.commands.push(spec);
        self
    }

    /// Attaches `action` to the declared command called `name`.
    pub fn on(mut self, name: &str, action: impl Fn(&Context<'_>) + 'static) -> Self {
        self.actions.insert(name.to_string(), Box::new(action));
        self
    }

    pub fn spec(&self) -> &AppSpec {
        &self.spec
    }

    /// Runs the application on a full argv (token 0 is the program name).
    ///
    /// Global flags must precede the command name. `-h`/`-help` shows
    /// application help and `-version` the version banner; both stop before
    /// any command runs. `help [command]` shows help for one command.
    ///
    /// # Errors
    ///
    /// Global flag errors are returned as [`DispatchError::Usage`]; an
    /// unknown command as [`DispatchError::CommandNotFound`]; everything
    /// else comes from [`dispatch`].
    pub fn run<I, S>(&self, argv: I, out: &mut dyn Presenter) -> Result<Outcome, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let argv: Vec<String> = argv
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();

        let mut global_specs = self.spec.flags.clone();
        global_specs.push(FlagSpec::bool(HELP_FLAG).with_usage("show help"));
        global_specs.push(FlagSpec::bool(VERSION_FLAG).with_usage("print the version"));
        let mut globals = FlagSet::from_specs(&self.spec.name, &global_specs)?;

        let errors = globals.parse(argv.iter().skip(1));
        if !errors.is_empty() {
            let held: Vec<UsageError> = errors.into_iter().map(UsageError::Flag).collect();
            for err in &held {
                out.error("Incorrect Usage", &err.to_string())?;
            }
            out.app_help(&self.spec)?;
            return Err(DispatchError::Usage(held));
        }
        if let Err(err) = normalize_flags(&global_specs, &mut globals) {
            out.error("Invalid Flags", &err.to_string())?;
            out.app_help(&self.spec)?;
            return Err(err);
        }

        if flag_true(&globals, "h") || flag_true(&globals, "help") {
            out.app_help(&self.spec)?;
            return Ok(Outcome::HelpShown);
        }
        if flag_true(&globals, VERSION_FLAG) {
            out.version(&self.spec)?;
            return Ok(Outcome::VersionShown);
        }

        let invocation = globals.args().to_vec();
        let Some(name) = invocation.first() else {
            debug!(app = %self.spec.name, "No command given");
            out.app_help(&self.spec)?;
            return Ok(Outcome::HelpShown);
        };

        let Some(cmd) = self.spec.find_command(name) else {
            if name == "help" || name == "h" {
                return self.show_help(invocation.get(1).map(String::as_str), out);
            }
            out.notice(&format!("No help topic for '{name}'"))?;
            return Err(DispatchError::CommandNotFound(name.clone()));
        };

        debug!(app = %self.spec.name, command = %cmd.name, "Dispatching command");
        match self.actions.get(&cmd.name) {
            Some(action) => dispatch(cmd, &**action, &invocation, Some(&globals), out),
            None => dispatch(cmd, &no_action, &invocation, Some(&globals), out),
        }
    }

    fn show_help(
        &self,
        topic: Option<&str>,
        out: &mut dyn Presenter,
    ) -> Result<Outcome, DispatchError> {
        let Some(topic) = topic else {
            out.app_help(&self.spec)?;
            return Ok(Outcome::HelpShown);
        };
        match self.spec.find_command(topic) {
            Some(cmd) => {
                out.command_help(cmd)?;
                Ok(Outcome::HelpShown)
            }
            None => {
                out.notice(&format!("No help topic for '{topic}'"))?;
                Err(DispatchError::CommandNotFound(topic.to_string()))
            }
        }
    }

    /// Declared command called `name` (or with that short name).
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.spec.find_command(name)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("spec", &self.spec)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn flag_true(set: &FlagSet, name: &str) -> bool {
    set.lookup(name)
        .is_some_and(|value| value.as_text() == "true")
}

fn no_action(ctx: &Context<'_>) {
    debug!(command = ctx.command_name(), "No action attached");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cmdkit_core::ArgumentSpec;

    use crate::terminal::Terminal;

    use super::*;

    fn sample() -> (App, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let spec = AppSpec::new("tool")
            .with_version("1.4.0")
            .with_flag(FlagSpec::string("profile, p").with_default("dev"));
        let app = App::new(spec).with_command(Command::new(
            CommandSpec::new("deploy")
                .with_short_name("d")
                .with_argument(ArgumentSpec::required("service")),
            move |ctx| {
                sink.borrow_mut().push(format!(
                    "{}@{}",
                    ctx.named_arg("service"),
                    ctx.global_string("profile")
                ));
            },
        ));
        (app, log)
    }

    fn output(term: Terminal<Vec<u8>>) -> String {
        String::from_utf8(term.into_inner()).unwrap()
    }

    #[test]
    fn test_global_flags_reach_the_command() {
        let (app, log) = sample();
        let mut term = Terminal::plain(Vec::new());

        app.run(["tool", "-p", "prod", "d", "web"], &mut term).unwrap();
        app.run(["tool", "deploy", "api"], &mut term).unwrap();

        assert_eq!(*log.borrow(), vec!["web@prod", "api@dev"]);
        assert_eq!(app.command("d").map(|c| c.name.as_str()), Some("deploy"));
    }

    #[test]
    fn test_version_and_help_short_circuit() {
        let (app, log) = sample();

        let mut term = Terminal::plain(Vec::new());
        assert_eq!(
            app.run(["tool", "-version", "deploy", "x"], &mut term).unwrap(),
            Outcome::VersionShown
        );
        assert_eq!(output(term), "tool version 1.4.0\n");

        let mut term = Terminal::plain(Vec::new());
        assert_eq!(app.run(["tool", "-h"], &mut term).unwrap(), Outcome::HelpShown);
        assert!(output(term).contains("deploy, d"));

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_help_command_shows_command_help() {
        let (app, _) = sample();
        let mut term = Terminal::plain(Vec::new());

        assert_eq!(
            app.run(["tool", "help", "deploy"], &mut term).unwrap(),
            Outcome::HelpShown
        );
        assert!(output(term).contains("deploy service [--flags]"));

        let mut term = Terminal::plain(Vec::new());
        let err = app.run(["tool", "help", "nope"], &mut term).unwrap_err();
        assert!(matches!(err, DispatchError::CommandNotFound(name) if name == "nope"));
        assert!(output(term).contains("No help topic for 'nope'"));
    }

    #[test]
    fn test_unknown_command_and_bad_global_flag() {
        let (app, _) = sample();

        let mut term = Terminal::plain(Vec::new());
        let err = app.run(["tool", "launch"], &mut term).unwrap_err();
        assert!(matches!(err, DispatchError::CommandNotFound(_)));

        let mut term = Terminal::plain(Vec::new());
        let err = app.run(["tool", "-verbose", "deploy", "x"], &mut term).unwrap_err();
        assert_eq!(err.usage_errors().len(), 1);
        assert!(output(term).contains("[Incorrect Usage]"));
    }

    #[test]
    fn test_no_command_shows_app_help() {
        let (app, _) = sample();
        let mut term = Terminal::plain(Vec::new());
        assert_eq!(app.run(["tool"], &mut term).unwrap(), Outcome::HelpShown);
        assert!(output(term).starts_with("tool - 1.4.0"));
    }

    #[test]
    fn test_declared_command_without_action_runs() {
        let spec = AppSpec::new("tool").with_command(CommandSpec::new("noop"));
        let app = App::new(spec);
        let mut term = Terminal::plain(Vec::new());
        assert_eq!(app.run(["tool", "noop"], &mut term).unwrap(), Outcome::Invoked);
    }
}
