//! Dialog-session tests: rendering, option visibility, action
//! dispatch with its per-action failure boundary, and stack
//! navigation.

use std::collections::{HashMap, VecDeque};

use screept_ast::ast::{Expr, Value};
use screept_engine::{
    Choice, Dialog, DialogAction, DialogOption, EngineError, GameDefinition, GameState, Session,
};
use screept_interp::Environment;
use screept_parser::{parse_expression, parse_statement};

// ── Builders ───────────────────────────────────────────────────

fn text(s: &str) -> Expr {
    Expr::Literal(Value::Text(s.into()))
}

fn option(id: &str, condition: Option<&str>, actions: Vec<DialogAction>) -> DialogOption {
    DialogOption {
        id: id.into(),
        text: text(id),
        condition: condition.map(|src| parse_expression(src).unwrap()),
        actions,
    }
}

fn dialog(id: &str, body: &str, options: Vec<DialogOption>) -> Dialog {
    Dialog {
        id: id.into(),
        text: text(body),
        options,
    }
}

fn screept(src: &str) -> DialogAction {
    DialogAction::RunScreept(parse_statement(src).unwrap())
}

fn definition(dialogs: Vec<Dialog>, stack: &[&str]) -> GameDefinition {
    GameDefinition {
        game_state: GameState {
            environment: Environment::new(),
            dialog_stack: stack.iter().map(|s| s.to_string()).collect::<VecDeque<_>>(),
        },
        dialogs: dialogs
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect::<HashMap<_, _>>(),
    }
}

fn session(dialogs: Vec<Dialog>, stack: &[&str]) -> Session {
    Session::with_seed(definition(dialogs, stack), 0)
}

fn choose(session: &mut Session, input: &str) -> Choice {
    session.choose(input, &mut |_| {}).unwrap()
}

// ── Rendering ──────────────────────────────────────────────────

#[test]
fn conditions_filter_the_option_list() {
    // One option hidden by a zero condition, one unconditional.
    let s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![
                option("hidden", Some("0"), vec![]),
                option("visible", None, vec![]),
            ],
        )],
        &["start"],
    );
    let rendered = s.render().unwrap();
    assert_eq!(rendered.options.len(), 1);
    assert_eq!(rendered.options[0].text, "visible");
    assert_eq!(rendered.options[0].index, 1);
}

#[test]
fn text_conditions_are_truthy() {
    let s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option("textcond", Some("\"no\""), vec![])],
        )],
        &["start"],
    );
    assert_eq!(s.render().unwrap().options.len(), 1);
}

#[test]
fn dialog_text_splits_on_the_line_marker() {
    let s = session(
        vec![dialog("start", "first<nl>second<nl>third", vec![])],
        &["start"],
    );
    let rendered = s.render().unwrap();
    assert_eq!(rendered.lines, vec!["first", "second", "third"]);
}

#[test]
fn status_line_renders_when_it_is_a_function() {
    let mut def = definition(vec![dialog("start", "Hello", vec![])], &["start"]);
    def.game_state.environment.vars.insert(
        "__statusLine".into(),
        Value::Function(Box::new(parse_expression("\"HP \" + hp").unwrap())),
    );
    def.game_state
        .environment
        .vars
        .insert("hp".into(), Value::Number(9.0));
    let s = Session::with_seed(def, 0);
    assert_eq!(s.render().unwrap().status, Some("HP 9".into()));
}

#[test]
fn non_function_status_line_is_ignored() {
    let mut def = definition(vec![dialog("start", "Hello", vec![])], &["start"]);
    def.game_state
        .environment
        .vars
        .insert("__statusLine".into(), Value::Number(1.0));
    let s = Session::with_seed(def, 0);
    assert_eq!(s.render().unwrap().status, None);
}

#[test]
fn rendering_an_empty_stack_is_fatal() {
    let s = session(vec![dialog("start", "Hello", vec![])], &[]);
    assert_eq!(s.render().unwrap_err(), EngineError::EmptyStack);
}

#[test]
fn rendering_an_unknown_dialog_is_fatal() {
    let s = session(vec![dialog("start", "Hello", vec![])], &["nowhere"]);
    assert_eq!(
        s.render().unwrap_err(),
        EngineError::UnknownDialog("nowhere".into())
    );
}

// ── Choosing ───────────────────────────────────────────────────

#[test]
fn invalid_input_leaves_state_untouched() {
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option("opt", None, vec![screept("x = 1")])],
        )],
        &["start"],
    );
    assert_eq!(choose(&mut s, "nope"), Choice::Invalid);
    assert_eq!(choose(&mut s, "0"), Choice::Invalid);
    assert_eq!(choose(&mut s, "2"), Choice::Invalid);
    assert!(!s.environment().vars.contains_key("x"));
}

#[test]
fn choosing_runs_the_actions_in_order() {
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option(
                "opt",
                None,
                vec![
                    screept("{ x = 1; PRINT \"one\" }"),
                    DialogAction::Message(parse_expression("\"x is \" + x").unwrap()),
                ],
            )],
        )],
        &["start"],
    );
    let Choice::Taken(report) = choose(&mut s, "1") else {
        panic!("expected a taken choice");
    };
    assert_eq!(report.printed, vec!["one"]);
    assert_eq!(report.messages, vec!["x is 1"]);
    assert!(report.errors.is_empty());
}

#[test]
fn indices_count_only_visible_options() {
    // The hidden first option must not shift the numbering.
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![
                option("hidden", Some("0"), vec![screept("wrong = 1")]),
                option("visible", None, vec![screept("right = 1")]),
            ],
        )],
        &["start"],
    );
    let Choice::Taken(_) = choose(&mut s, "1") else {
        panic!("expected a taken choice");
    };
    assert!(s.environment().vars.contains_key("right"));
    assert!(!s.environment().vars.contains_key("wrong"));
}

#[test]
fn each_action_has_its_own_failure_boundary() {
    // The middle action fails; its siblings still run and the session
    // survives.
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option(
                "opt",
                None,
                vec![
                    screept("a = 1"),
                    screept("b = ghost"),
                    screept("c = 1"),
                ],
            )],
        )],
        &["start"],
    );
    let Choice::Taken(report) = choose(&mut s, "1") else {
        panic!("expected a taken choice");
    };
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("option 'opt', action 2"));
    assert!(report.errors[0].contains("undefined variable 'ghost'"));
    assert!(s.environment().vars.contains_key("a"));
    assert!(s.environment().vars.contains_key("c"));
}

#[test]
fn a_nested_failure_aborts_only_its_own_list() {
    // Inside a block the failure stops the rest of the block, but the
    // following top-level action still runs.
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option(
                "opt",
                None,
                vec![
                    DialogAction::Block(vec![
                        screept("a = 1"),
                        screept("b = ghost"),
                        screept("never = 1"),
                    ]),
                    screept("after = 1"),
                ],
            )],
        )],
        &["start"],
    );
    let Choice::Taken(report) = choose(&mut s, "1") else {
        panic!("expected a taken choice");
    };
    assert_eq!(report.errors.len(), 1);
    assert!(s.environment().vars.contains_key("a"));
    assert!(!s.environment().vars.contains_key("never"));
    assert!(s.environment().vars.contains_key("after"));
}

#[test]
fn conditional_actions_pick_a_branch() {
    let conditional = |cond: &str| DialogAction::Conditional {
        cond: parse_expression(cond).unwrap(),
        then_actions: vec![screept("taken = 1")],
        else_actions: vec![screept("skipped = 1")],
    };

    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![
                option("truthy", None, vec![conditional("1")]),
                option("falsy", None, vec![conditional("0")]),
            ],
        )],
        &["start"],
    );
    choose(&mut s, "1");
    assert!(s.environment().vars.contains_key("taken"));
    choose(&mut s, "2");
    assert!(s.environment().vars.contains_key("skipped"));
}

#[test]
fn emitted_strings_reach_the_host() {
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option("opt", None, vec![screept("EMIT \"badge\"")])],
        )],
        &["start"],
    );
    let mut emitted = Vec::new();
    s.choose("1", &mut |msg| emitted.push(msg.to_string()))
        .unwrap();
    assert_eq!(emitted, vec!["badge"]);
}

// ── Navigation ─────────────────────────────────────────────────

#[test]
fn go_dialog_pushes_and_go_back_pops() {
    let mut s = session(
        vec![
            dialog(
                "start",
                "Hello",
                vec![option("fwd", None, vec![DialogAction::GoDialog("next".into())])],
            ),
            dialog(
                "next",
                "Next",
                vec![option("back", None, vec![DialogAction::GoBack])],
            ),
        ],
        &["start"],
    );
    choose(&mut s, "1");
    assert_eq!(s.current_dialog_id(), Some("next"));
    choose(&mut s, "1");
    assert_eq!(s.current_dialog_id(), Some("start"));
}

#[test]
fn go_back_underflow_is_fatal() {
    // Pop the only frame, then the follow-up GoBack underflows; the
    // failure boundary does not contain it.
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![option(
                "back-twice",
                None,
                vec![DialogAction::GoBack, DialogAction::GoBack],
            )],
        )],
        &["start"],
    );
    let err = s.choose("1", &mut |_| {}).unwrap_err();
    assert_eq!(err, EngineError::StackUnderflow);
}

#[test]
fn condition_errors_are_fatal_at_render() {
    // Only action dispatch has a failure boundary; a condition that
    // references an unknown name fails the render itself.
    let s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![
                option("unlock", None, vec![screept("key = 1")]),
                option("locked", Some("key == 1"), vec![]),
            ],
        )],
        &["start"],
    );
    let err = s.render().unwrap_err();
    assert!(matches!(err, EngineError::Runtime(_)));
}

#[test]
fn state_persists_between_turns() {
    let mut s = session(
        vec![dialog(
            "start",
            "Hello",
            vec![
                option("init", None, vec![screept("{ gold = 0 }")]),
                option("earn", None, vec![screept("gold = gold + 5")]),
            ],
        )],
        &["start"],
    );
    choose(&mut s, "1");
    choose(&mut s, "2");
    choose(&mut s, "2");
    assert_eq!(s.environment().vars["gold"], Value::Number(10.0));
}
