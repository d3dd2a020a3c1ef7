use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use cmdkit::{App, Context, FlagSet, Outcome, Terminal};
use cmdkit_core::{AppSpec, FlagValue, validate_app};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when the probed invocation fails to dispatch.
const DISPATCH_FAILURE: i32 = 2;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdkit-probe")]
#[command(about = "Dispatch an argv against a declared application and show how it resolves")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dispatch ARGV (program name first) and print what the command received.
    Run(RunArgs),
    /// Check one or more application declarations.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Application declaration (YAML, or JSON with a .json extension).
    #[arg(long)]
    spec: PathBuf,
    /// Output format for the resolution snapshot.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Invocation to dispatch; the first token is the program name.
    #[arg(last = true, required = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Declaration files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// Everything an action observed for one invocation.
#[derive(Debug, Serialize)]
struct Snapshot {
    command: String,
    arguments: BTreeMap<String, String>,
    args: Vec<String>,
    flags: BTreeMap<String, FlagValue>,
    global_flags: BTreeMap<String, FlagValue>,
    set_flags: Vec<String>,
}

impl Snapshot {
    fn capture(ctx: &Context<'_>) -> Self {
        Self {
            command: ctx.command_name().to_string(),
            arguments: ctx
                .arguments()
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            args: ctx.args().to_vec(),
            flags: values(ctx.flags()),
            global_flags: ctx.global_flags().map(values).unwrap_or_default(),
            set_flags: ctx.flags().set_flags().map(str::to_string).collect(),
        }
    }
}

fn values(set: &FlagSet) -> BTreeMap<String, FlagValue> {
    set.names()
        .filter_map(|name| Some((name.to_string(), set.lookup(name)?.clone())))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run_probe(args),
        Command::Validate(args) => run_validate(args),
    };

    let _ = std::io::stdout().flush();
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_probe(args: RunArgs) -> Result<i32, String> {
    let spec = AppSpec::load(&args.spec)
        .map_err(|err| format!("Failed to load '{}': {err}", args.spec.display()))?;
    let problems = validate_app(&spec);
    if !problems.is_empty() {
        return Err(format!(
            "'{}' is not a valid declaration: {}",
            args.spec.display(),
            join(&problems)
        ));
    }

    let captured: Rc<RefCell<Option<Snapshot>>> = Rc::new(RefCell::new(None));
    let names: Vec<String> = spec
        .command_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let app = names.iter().fold(App::new(spec), |app, name| {
        let sink = Rc::clone(&captured);
        app.on(name, move |ctx| {
            *sink.borrow_mut() = Some(Snapshot::capture(ctx));
        })
    });

    let mut term = Terminal::stdout();
    let outcome = match app.run(&args.argv, &mut term) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(DISPATCH_FAILURE);
        }
    };
    debug!(outcome = ?outcome, "Probe finished");

    if outcome != Outcome::Invoked {
        return Ok(0);
    }
    let Some(snapshot) = captured.borrow_mut().take() else {
        return Err("Command ran without recording a snapshot".to_string());
    };
    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&snapshot)
            .map_err(|err| format!("Failed to serialize snapshot: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&snapshot)
            .map_err(|err| format!("Failed to serialize snapshot: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(0)
}

fn run_validate(args: ValidateArgs) -> Result<i32, String> {
    let mut failed = 0usize;
    for path in &args.inputs {
        let spec = match AppSpec::load(path) {
            Ok(spec) => spec,
            Err(err) => {
                println!("{}: {err}", path.display());
                failed += 1;
                continue;
            }
        };
        let problems = validate_app(&spec);
        for problem in &problems {
            println!("{}: {problem}", path.display());
        }
        if !problems.is_empty() {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!(
            "{failed} of {} declaration(s) failed validation",
            args.inputs.len()
        ));
    }
    println!("Validated {} declaration(s).", args.inputs.len());
    Ok(0)
}

fn join(problems: &[impl std::fmt::Display]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
