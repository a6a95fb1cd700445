// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::rstest;

use plantscribe::build::activity::{IfSpec, SwimlaneSpec, WhileSpec};
use plantscribe::build::sequence::{
    AutonumberSpec, GroupSpec, MessageSpec, ParticipantSpec, SeqNoteSpec,
};
use plantscribe::build::{ActivityGrammar, ActivityScope, Engine};
use plantscribe::model::{
    Action, Activation, ActivityNode, NoteShape, ParticipantKind, SequenceArrow,
    SequenceBlockKind, SequenceHead, SequenceLine,
};
use plantscribe::{
    export_diagram, unescape, ActivityDiagram, BuildError, RenderOptions, SequenceDiagram,
    StructuralError,
};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("plantuml")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn render(diagram: plantscribe::Diagram) -> String {
    export_diagram(&diagram, &RenderOptions::default())
        .unwrap_or_else(|err| panic!("expected diagram to export, got error: {err}"))
}

fn activity_kinds(diagram: &plantscribe::Diagram) -> Vec<&'static str> {
    let ast = diagram.as_activity().expect("activity diagram");
    ast.nodes().iter().map(ActivityNode::kind_name).collect()
}

#[test]
fn linear_activity_has_three_nodes() {
    let mut diagram = ActivityDiagram::new();
    let mut body = diagram.body();
    body.start().expect("start");
    body.action("Validate Input").expect("action");
    body.stop().expect("stop");

    let diagram = diagram.finish().expect("finish");
    assert_eq!(activity_kinds(&diagram), vec!["start", "action", "stop"]);
    assert_eq!(render(diagram), "@startuml\nstart\n:Validate Input;\nstop\n@enduml\n");
}

#[test]
fn fork_keeps_both_branches() {
    let mut diagram = ActivityDiagram::new();
    diagram
        .body()
        .fork(|fork| {
            fork.branch(|branch| branch.action("A"))?;
            fork.branch(|branch| branch.action("B"))
        })
        .expect("fork");

    let diagram = diagram.finish().expect("finish");
    let ast = diagram.as_activity().expect("activity diagram");
    let [ActivityNode::Parallel(parallel)] = ast.nodes() else {
        panic!("expected a single fork node, got {:?}", ast.nodes());
    };
    let texts: Vec<_> = parallel
        .branches()
        .iter()
        .map(|branch| match branch.children() {
            [ActivityNode::Action(action)] => action.text().to_owned(),
            other => panic!("expected one action per branch, got {other:?}"),
        })
        .collect();
    assert_eq!(texts, vec!["A", "B"]);
}

#[test]
fn fork_cannot_close_while_a_branch_is_open() {
    let mut engine = Engine::<ActivityGrammar>::new();
    let fork = engine.open(ActivityScope::fork()).expect("fork");
    let _branch = engine.open(ActivityScope::branch()).expect("branch");
    engine.leaf(ActivityNode::Action(Action::new("A"))).expect("action");

    assert_eq!(
        engine.close(fork),
        Err(BuildError::Structural(StructuralError::OutOfOrderClose {
            requested: "fork",
            innermost: "branch",
            call: 4,
        }))
    );
    assert_eq!(engine.finish(), Err(StructuralError::Abandoned { failed_at: 4 }));
}

#[test]
fn break_nested_in_decision_inside_loop() {
    let mut diagram = ActivityDiagram::new();
    diagram
        .body()
        .while_("more?", |lp| {
            lp.action("process")?;
            lp.if_("failed?", |decision| decision.break_())
        })
        .expect("while");

    let diagram = diagram.finish().expect("finish");
    assert_eq!(activity_kinds(&diagram), vec!["while"]);
    let expected = "\
@startuml
while (more?)
  :process;
  if (failed?) then
    break
  endif
endwhile
@enduml
";
    assert_eq!(render(diagram), expected);
}

#[test]
fn break_outside_any_loop_fails() {
    let mut diagram = ActivityDiagram::new();
    let err = diagram
        .body()
        .group("setup", |group| group.break_())
        .expect_err("no loop encloses the break");
    assert_eq!(
        err.as_structural(),
        Some(&StructuralError::BreakOutsideLoop { scope: "group", call: 2 })
    );
    assert!(diagram.finish().is_err());
}

#[test]
fn decision_branches_keep_call_order() {
    let mut diagram = ActivityDiagram::new();
    diagram
        .body()
        .if_("a?", |decision| {
            decision.action("first")?;
            decision.elseif("b?")?;
            decision.action("second")?;
            decision.else_(None)?;
            decision.action("third")
        })
        .expect("if");

    let diagram = diagram.finish().expect("finish");
    let ast = diagram.as_activity().expect("activity diagram");
    let [ActivityNode::Decision(decision)] = ast.nodes() else {
        panic!("expected a single decision node");
    };
    assert_eq!(decision.branch_count(), 3);
    assert_eq!(decision.then().condition(), "a?");
    assert_eq!(decision.elseifs()[0].condition(), "b?");
    assert!(decision.otherwise().is_some());
}

#[test]
fn second_else_is_rejected() {
    let mut diagram = ActivityDiagram::new();
    let err = diagram
        .body()
        .if_("a?", |decision| {
            decision.else_(None)?;
            decision.else_(Some("again"))
        })
        .expect_err("two else branches");
    assert!(matches!(err.as_structural(), Some(StructuralError::DuplicateElse { .. })));
}

#[test]
fn unclosed_scope_is_named_at_finish() {
    let mut diagram = ActivityDiagram::new();
    let engine = diagram.engine_mut();
    let scope = ActivityScope::while_(WhileSpec::new("more?")).expect("while");
    let _loop = engine.open(scope).expect("open");
    assert!(matches!(
        diagram.finish(),
        Err(BuildError::Structural(StructuralError::UnclosedScope {
            kind: "while",
            opened_at: 1,
            open: 1
        }))
    ));
}

#[test]
fn closures_leave_no_scope_open() {
    let mut diagram = ActivityDiagram::new();
    diagram
        .body()
        .partition("outer", |outer| {
            outer.group("inner", |inner| {
                inner.if_(IfSpec::new("deep?"), |decision| decision.action("bottom"))
            })
        })
        .expect("nested scopes");
    assert_eq!(diagram.engine().depth(), 0);
    assert_eq!(diagram.engine().calls(), 7);
    assert!(diagram.finish().is_ok());
}

#[rstest]
#[case("plain text")]
#[case("a ** b // c")]
#[case("--dashes-- and __underscores__")]
#[case("~tilde and \"quotes\"")]
#[case("* leading star")]
#[case("trailing pipe |")]
fn action_text_survives_escaping(#[case] text: &str) {
    let mut diagram = ActivityDiagram::new();
    diagram.body().action(text).expect("action");
    let options = RenderOptions::default().with_wrap(false);
    let rendered =
        export_diagram(&diagram.finish().expect("finish"), &options).expect("export");

    let line = rendered.trim_end_matches('\n');
    let inner = line
        .strip_prefix(':')
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap_or_else(|| panic!("unexpected action line {line:?}"));
    assert_eq!(unescape(inner), text);
}

#[test]
fn order_activity_matches_fixture() {
    let mut diagram = ActivityDiagram::named("order").expect("name");
    diagram.meta_mut().set_title("Order handling").expect("title");
    let mut body = diagram.body();
    body.start().expect("start");
    body.swimlane("Customer").expect("lane");
    body.action("Browse").expect("browse");
    body.swimlane(SwimlaneSpec::new("Warehouse")).expect("lane");
    body.if_(IfSpec::new("in stock?").with_label("yes"), |decision| {
        decision.action("Pick")?;
        decision.else_(Some("no"))?;
        decision.action("Backorder")
    })
    .expect("if");
    body.fork(|fork| {
        fork.branch(|branch| branch.action("Pack"))?;
        fork.branch(|branch| branch.action("Invoice"))?;
        fork.end_merge()
    })
    .expect("fork");
    body.stop().expect("stop");

    assert_eq!(diagram.lanes().names(), ["Customer", "Warehouse"]);
    assert_eq!(render(diagram.finish().expect("finish")), read_fixture("order_activity.puml"));
}

#[test]
fn checkout_sequence_matches_fixture() {
    let mut diagram = SequenceDiagram::named("checkout").expect("name");
    diagram.meta_mut().set_title("Checkout").expect("title");
    let mut body = diagram.body();
    body.participant(ParticipantSpec::of_kind(ParticipantKind::Actor, "Customer"))
        .expect("customer");
    let shop = body.participant(ParticipantSpec::new("Web Shop").with_alias("Shop")).expect("shop");
    body.participant(ParticipantSpec::of_kind(ParticipantKind::Database, "Orders"))
        .expect("orders");
    body.autonumber(AutonumberSpec::new()).expect("autonumber");
    body.message_with(
        MessageSpec::new("Customer", &shop)
            .with_text("place order")
            .with_activation(Activation::ActivateTarget),
    )
    .expect("order");
    body.group(GroupSpec::labeled(SequenceBlockKind::Alt, "in stock"), |alt| {
        alt.message(&shop, "Orders", "insert")?;
        alt.else_(Some("out of stock"))?;
        alt.message_with(
            MessageSpec::new(&shop, "Customer")
                .with_text("sorry")
                .with_arrow(SequenceArrow::new(SequenceLine::Dotted, SequenceHead::Filled)),
        )
    })
    .expect("alt");
    body.return_(Some("confirmation")).expect("return");
    body.note(SeqNoteSpec::over(&["Customer"], "happy\npath").with_shape(NoteShape::Hexagon))
        .expect("note");

    assert_eq!(render(diagram.finish().expect("finish")), read_fixture("checkout_sequence.puml"));
}

#[test]
fn message_to_undeclared_participant_fails() {
    let mut diagram = SequenceDiagram::new();
    let mut body = diagram.body();
    body.participant("Api").expect("api");
    let err = body.message("Api", "Nobody", "hello?").expect_err("unknown participant");
    assert!(matches!(
        err.as_structural(),
        Some(StructuralError::UnknownIdentifier { expected: "participant", call: 2, .. })
    ));
}
