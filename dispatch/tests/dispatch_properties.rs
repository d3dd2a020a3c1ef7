use std::cell::RefCell;
use std::rc::Rc;

use cmdkit::{App, Command, DispatchError, Outcome, Terminal, UsageError};
use cmdkit_core::{AppSpec, ArgumentSpec, CommandSpec, FlagSpec};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// What an action observed, captured for assertions after dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
struct Seen {
    args: Vec<(String, String)>,
    x: String,
    verbose: String,
    v: String,
    verbose_set: bool,
    v_set: bool,
    tags: Vec<String>,
    leftover: Vec<String>,
}

fn argv(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn recording(spec: CommandSpec) -> (Command, Rc<RefCell<Vec<Seen>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let cmd = Command::new(spec, move |ctx| {
        sink.borrow_mut().push(Seen {
            args: ctx
                .arguments()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            x: ctx.string("x"),
            verbose: ctx.string("verbose"),
            v: ctx.string("v"),
            verbose_set: ctx.is_set("verbose"),
            v_set: ctx.is_set("v"),
            tags: ctx.string_list("tag"),
            leftover: ctx.args().to_vec(),
        });
    });
    (cmd, log)
}

fn sample_spec() -> CommandSpec {
    CommandSpec::new("cmd")
        .with_argument(ArgumentSpec::required("first"))
        .with_argument(ArgumentSpec::required("second"))
        .with_argument(ArgumentSpec::optional("third"))
        .with_flag(FlagSpec::int("x"))
        .with_flag(FlagSpec::string("verbose, v"))
        .with_flag(FlagSpec::string_list("tag"))
}

// ---------------------------------------------------------------------------
// Arity
// ---------------------------------------------------------------------------

#[test]
fn too_few_positionals_yield_arity_error_without_invoking() {
    for (tokens, got) in [
        (vec!["cmd"], 0),
        (vec!["cmd", "a"], 1),
        (vec!["cmd", "-x=3", "a"], 1),
    ] {
        let (cmd, log) = recording(sample_spec());
        let mut term = Terminal::plain(Vec::new());

        let err = cmd.run(&argv(&tokens), None, &mut term).unwrap_err();

        assert_eq!(
            err.usage_errors(),
            [UsageError::Arity { required: 2, got }],
            "tokens: {tokens:?}"
        );
        assert!(log.borrow().is_empty());
    }
}

#[test]
fn optional_arguments_may_be_omitted() {
    let (cmd, log) = recording(sample_spec());
    let mut term = Terminal::plain(Vec::new());

    assert_eq!(
        cmd.run(&argv(&["cmd", "a", "b"]), None, &mut term).unwrap(),
        Outcome::Invoked
    );
    assert_eq!(log.borrow()[0].args.len(), 2);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn mixed_order_invocations_resolve_identically() {
    let orders: [&[&str]; 4] = [
        &["cmd", "posA", "-x=1", "posB"],
        &["cmd", "-x=1", "posA", "posB"],
        &["cmd", "posA", "posB", "-x=1"],
        &["cmd", "posA", "-x", "1", "posB"],
    ];

    let mut results = Vec::new();
    for order in orders {
        let (cmd, log) = recording(sample_spec());
        let mut term = Terminal::plain(Vec::new());
        cmd.run(&argv(order), None, &mut term).unwrap();
        results.push(log.borrow()[0].clone());
    }

    for seen in &results {
        assert_eq!(
            seen.args,
            vec![
                ("first".to_string(), "posA".to_string()),
                ("second".to_string(), "posB".to_string()),
            ]
        );
        assert_eq!(seen.x, "1");
    }
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn excess_positionals_stay_reachable() {
    let (cmd, log) = recording(sample_spec());
    let mut term = Terminal::plain(Vec::new());

    cmd.run(&argv(&["cmd", "a", "-x=2", "b", "c", "d", "--", "-e"]), None, &mut term)
        .unwrap();

    let seen = &log.borrow()[0];
    assert_eq!(seen.args.len(), 3);
    assert_eq!(seen.leftover, vec!["a", "b", "c", "d", "-e"]);
}

// ---------------------------------------------------------------------------
// Aliases
// ---------------------------------------------------------------------------

#[test]
fn short_alias_resolves_under_both_names() {
    let (cmd, log) = recording(sample_spec());
    let mut term = Terminal::plain(Vec::new());

    cmd.run(&argv(&["cmd", "a", "b", "-v=loud"]), None, &mut term)
        .unwrap();

    let seen = &log.borrow()[0];
    assert_eq!(seen.verbose, "loud");
    assert_eq!(seen.v, "loud");
    assert!(seen.verbose_set);
    assert!(seen.v_set);
}

#[test]
fn both_alias_forms_conflict() {
    let (cmd, log) = recording(sample_spec());
    let mut term = Terminal::plain(Vec::new());

    let err = cmd
        .run(&argv(&["cmd", "a", "b", "-v=a", "-verbose=b"]), None, &mut term)
        .unwrap_err();

    assert!(matches!(err, DispatchError::AliasConflict { .. }));
    assert!(err.to_string().contains("cannot use two forms of the same flag"));
    assert!(log.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[test]
fn list_flags_accumulate_in_encounter_order() {
    let (cmd, log) = recording(sample_spec());
    let mut term = Terminal::plain(Vec::new());

    cmd.run(
        &argv(&["cmd", "-tag=a", "p1", "-tag=b", "p2", "-tag", "c"]),
        None,
        &mut term,
    )
    .unwrap();

    assert_eq!(log.borrow()[0].tags, vec!["a", "b", "c"]);
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

#[test]
fn help_short_circuits_regardless_of_errors() {
    for tokens in [
        vec!["cmd", "-h"],
        vec!["cmd", "-help", "a"],
        vec!["cmd", "-x=notanumber", "--h"],
        vec!["cmd", "-unknown", "-h", "a", "b", "c", "d"],
    ] {
        let (cmd, log) = recording(sample_spec());
        let mut term = Terminal::plain(Vec::new());

        let outcome = cmd.run(&argv(&tokens), None, &mut term).unwrap();

        assert_eq!(outcome, Outcome::HelpShown, "tokens: {tokens:?}");
        assert!(log.borrow().is_empty());
        let text = String::from_utf8(term.into_inner()).unwrap();
        assert!(text.contains("cmd first second [third] [--flags]"));
    }
}

// ---------------------------------------------------------------------------
// Zero values
// ---------------------------------------------------------------------------

#[test]
fn missing_flags_read_as_zero_values() {
    let observed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    let cmd = Command::new(CommandSpec::new("z"), move |ctx| {
        *sink.borrow_mut() = Some((
            ctx.int("missing"),
            ctx.bool("missing"),
            ctx.string("missing"),
            ctx.float64("missing"),
            ctx.global_int("missing"),
        ));
    });
    let mut term = Terminal::plain(Vec::new());

    cmd.run(&argv(&["z"]), None, &mut term).unwrap();

    assert_eq!(
        *observed.borrow(),
        Some((0, false, String::new(), 0.0, 0))
    );
}

// ---------------------------------------------------------------------------
// Application scope
// ---------------------------------------------------------------------------

#[test]
fn app_passes_global_scope_and_local_flags_separately() {
    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let spec = AppSpec::new("tool")
        .with_flag(FlagSpec::int("level, l").with_default(1))
        .with_command(
            CommandSpec::new("run")
                .with_argument(ArgumentSpec::required("target"))
                .with_flag(FlagSpec::int("level")),
        );
    let app = App::new(spec).on("run", move |ctx| {
        sink.borrow_mut().push((
            ctx.named_arg("target").to_string(),
            ctx.int("level"),
            ctx.global_int("level"),
            ctx.global_int("l"),
        ));
    });
    let mut term = Terminal::plain(Vec::new());

    app.run(["tool", "-l=5", "run", "-level", "9", "web"], &mut term)
        .unwrap();
    app.run(["tool", "run", "api"], &mut term).unwrap();

    assert_eq!(
        *observed.borrow(),
        vec![("web".to_string(), 9, 5, 5), ("api".to_string(), 0, 1, 1)]
    );
}
