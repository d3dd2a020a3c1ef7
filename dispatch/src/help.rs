//! Help text rendering for commands and applications.

use cmdkit_core::{AppSpec, CommandSpec, FlagKind, FlagSpec, HELP_FLAG, VERSION_FLAG};

use crate::terminal::{Ansi, paint};

const HELP_COMMAND: (&str, &str) = ("help, h", "Shows a list of commands or help for one command");

/// Renders help for one command.
///
/// Required arguments appear bare in the usage line and optional ones in
/// brackets. The help flag appended at dispatch is always listed.
///
/// # Examples
///
/// ```
/// use cmdkit::render_command_help;
/// use cmdkit_core::{ArgumentSpec, CommandSpec};
///
/// let cmd = CommandSpec::new("copy")
///     .with_argument(ArgumentSpec::required("src"))
///     .with_argument(ArgumentSpec::optional("dest"));
///
/// let text = render_command_help(&cmd, false);
/// assert!(text.contains("copy src [dest] [--flags]"));
/// assert!(text.contains("--help, -h"));
/// ```
pub fn render_command_help(cmd: &CommandSpec, color: bool) -> String {
    let mut out = String::new();

    let mut usage = vec![cmd.name.clone()];
    usage.extend(cmd.arguments.iter().map(|arg| {
        if arg.optional {
            format!("[{}]", arg.name)
        } else {
            arg.name.clone()
        }
    }));
    usage.push("[--flags]".to_string());
    section(&mut out, "Usage:", color);
    out.push_str(&format!("   {}\n", usage.join(" ")));

    if let Some(desc) = &cmd.description {
        out.push_str(&format!("\n   {desc}\n"));
    }

    if !cmd.arguments.is_empty() {
        out.push('\n');
        section(&mut out, "Arguments:", color);
        let rows: Vec<(String, String)> = cmd
            .arguments
            .iter()
            .map(|arg| {
                let label = if arg.optional {
                    format!("[{}]", arg.name)
                } else {
                    arg.name.clone()
                };
                let text = if arg.description.is_empty() {
                    arg.usage.clone()
                } else {
                    arg.description.clone()
                };
                (label, text)
            })
            .collect();
        push_table(&mut out, &rows);
    }

    out.push('\n');
    section(&mut out, "Flags:", color);
    let help = FlagSpec::bool(HELP_FLAG).with_usage("show help");
    let rows: Vec<(String, String)> = cmd
        .flags
        .iter()
        .chain(std::iter::once(&help))
        .map(flag_row)
        .collect();
    push_table(&mut out, &rows);

    if let Some(example) = &cmd.example {
        out.push('\n');
        section(&mut out, "Example:", color);
        out.push_str(&format!("   {example}\n"));
    }

    out
}

/// Renders application help: commands with their short names, then global
/// options.
///
/// # Examples
///
/// ```
/// use cmdkit::render_app_help;
/// use cmdkit_core::{AppSpec, CommandSpec};
///
/// let app = AppSpec::new("tool")
///     .with_version("2.0.0")
///     .with_command(CommandSpec::new("build").with_short_name("b").with_description("Build it"));
///
/// let text = render_app_help(&app, false);
/// assert!(text.starts_with("tool - 2.0.0"));
/// assert!(text.contains("build, b"));
/// assert!(text.contains("Build it"));
/// ```
pub fn render_app_help(app: &AppSpec, color: bool) -> String {
    let mut out = String::new();

    let header = match &app.version {
        Some(version) => format!(
            "{} - {}",
            paint(&app.name, &[Ansi::FgYellow], color),
            paint(version, &[Ansi::FgYellow], color)
        ),
        None => paint(&app.name, &[Ansi::FgYellow], color),
    };
    out.push_str(&header);
    out.push('\n');
    if let Some(desc) = &app.description {
        out.push_str(&format!("   {desc}\n"));
    }

    out.push('\n');
    section(&mut out, "Usage:", color);
    out.push_str(&format!(
        "   {} [global options] command [command options] [arguments...]\n",
        app.name
    ));

    out.push('\n');
    section(&mut out, "Commands:", color);
    let mut rows: Vec<(String, String)> = app
        .commands
        .iter()
        .map(|cmd| {
            let label = match &cmd.short_name {
                Some(short) => format!("{}, {short}", cmd.name),
                None => cmd.name.clone(),
            };
            (label, cmd.description.clone().unwrap_or_default())
        })
        .collect();
    rows.push((HELP_COMMAND.0.to_string(), HELP_COMMAND.1.to_string()));
    push_table(&mut out, &rows);

    out.push('\n');
    section(&mut out, "Global Options:", color);
    let builtin = [
        FlagSpec::bool(HELP_FLAG).with_usage("show help"),
        FlagSpec::bool(VERSION_FLAG).with_usage("print the version"),
    ];
    let rows: Vec<(String, String)> = app.flags.iter().chain(&builtin).map(flag_row).collect();
    push_table(&mut out, &rows);

    out
}

/// One-line version banner.
pub fn render_version(app: &AppSpec) -> String {
    format!(
        "{} version {}",
        app.name,
        app.version.as_deref().unwrap_or("unknown")
    )
}

fn section(out: &mut String, title: &str, color: bool) {
    out.push_str(&paint(title, &[Ansi::FgYellow], color));
    out.push('\n');
}

fn flag_row(flag: &FlagSpec) -> (String, String) {
    let names: Vec<String> = flag
        .names()
        .into_iter()
        .map(|name| {
            if name.chars().count() == 1 {
                format!("-{name}")
            } else {
                format!("--{name}")
            }
        })
        .collect();
    let mut label = names.join(", ");
    if flag.kind != FlagKind::Bool {
        label.push_str(&format!(" <{}>", flag.kind));
    }

    let mut text = flag.usage.clone();
    let default = flag.default_value();
    if default != flag.kind.zero() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("(default: {default})"));
    }
    if flag.kind.is_list() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str("(repeatable)");
    }
    (label, text)
}

fn push_table(out: &mut String, rows: &[(String, String)]) {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, text) in rows {
        let line = if text.is_empty() {
            format!("   {label}")
        } else {
            format!("   {label:<width$}  {text}")
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use cmdkit_core::ArgumentSpec;

    use super::*;

    #[test]
    fn test_flag_row_marks_defaults_and_lists() {
        let (label, text) =
            flag_row(&FlagSpec::int("count, c").with_usage("runs").with_default(3));
        assert_eq!(label, "--count, -c <int>");
        assert_eq!(text, "runs (default: 3)");

        let (label, text) = flag_row(&FlagSpec::string_list("tag"));
        assert_eq!(label, "--tag <string_list>");
        assert_eq!(text, "(repeatable)");
    }

    #[test]
    fn test_command_help_sections() {
        let cmd = CommandSpec::new("deploy")
            .with_description("Deploy a service")
            .with_example("tool deploy web -r 3")
            .with_argument(ArgumentSpec::required("service").with_description("what to deploy"))
            .with_flag(FlagSpec::int("replicas, r"));

        let text = render_command_help(&cmd, false);
        assert!(text.contains("Usage:\n   deploy service [--flags]\n"));
        assert!(text.contains("Arguments:\n   service  what to deploy\n"));
        assert!(text.contains("--replicas, -r <int>"));
        assert!(text.contains("Example:\n   tool deploy web -r 3\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_app_help_lists_builtins() {
        let app = AppSpec::new("tool");
        let text = render_app_help(&app, true);
        assert!(text.contains("help, h"));
        assert!(text.contains("--version"));
        assert!(text.contains("\x1b[33mCommands:\x1b[0m"));
        assert_eq!(render_version(&app), "tool version unknown");
    }
}
