// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{export_activity, export_class, export_diagram, export_sequence, export_state};
use crate::build::activity::ArrowSpec;
use crate::build::{ActivityDiagram, MAX_SCOPE_DEPTH};
use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::model::{
    Action, ActivityAst, ActivityNode, Alias, ClassAst, ClassNode, Color, CompositeState, Group,
    LineStyle, Package, PackageKind, Region, RegionSeparator, SequenceAst, SequenceBlock,
    SequenceBlockKind, SequenceNode, SequenceSection, State, StateAst, StateNode,
};

#[test]
fn metadata_wraps_the_body_in_a_fixed_order() {
    let mut diagram = ActivityDiagram::named("checkout").expect("name");
    let meta = diagram.meta_mut();
    meta.set_legend("Legend\nend of legend").expect("legend");
    meta.set_caption("fig. 1").expect("caption");
    meta.set_title("Checkout **flow**").expect("title");
    meta.add_skinparam("monochrome", "true").expect("skinparam");
    meta.add_include("<C4/C4_Container>").expect("include");
    meta.set_theme("plain").expect("theme");
    meta.set_footer("page 1").expect("footer");
    meta.set_header("draft").expect("header");
    diagram.body().start().expect("start");

    let diagram = diagram.finish().expect("finish");
    let expected = "\
@startuml checkout
!theme plain
!include <C4/C4_Container>
skinparam monochrome true
title Checkout ~*~*flow~*~*
header draft
footer page 1
caption fig. 1
start
legend
  Legend
  ~end of legend
endlegend
@enduml
";
    assert_eq!(export_diagram(&diagram, &RenderOptions::default()).expect("export"), expected);
}

#[rstest]
#[case(RenderOptions::default(), "@startuml\n@enduml\n")]
#[case(RenderOptions::default().with_wrap(false), "")]
#[case(RenderOptions::default().with_trailing_newline(false), "@startuml\n@enduml")]
fn empty_diagrams_render_minimal_text(#[case] options: RenderOptions, #[case] expected: &str) {
    assert_eq!(export_activity(&ActivityAst::default(), &options).expect("export"), expected);
    assert_eq!(export_sequence(&SequenceAst::default(), &options).expect("export"), expected);
}

#[test]
fn indent_width_is_configurable() {
    let mut diagram = ActivityDiagram::new();
    diagram.body().group("g", |group| group.action("a")).expect("group");
    let diagram = diagram.finish().expect("finish");

    let options = RenderOptions::default().with_indent(4).with_wrap(false);
    assert_eq!(
        export_diagram(&diagram, &options).expect("export"),
        "group g\n    :a;\nend group\n"
    );
    let flat = RenderOptions::default().with_indent(0).with_wrap(false);
    assert_eq!(export_diagram(&diagram, &flat).expect("export"), "group g\n:a;\nend group\n");
}

#[test]
fn arrow_style_is_bracketed() {
    let mut diagram = ActivityDiagram::new();
    let mut body = diagram.body();
    body.action("a").expect("a");
    body.arrow(
        ArrowSpec::new()
            .with_label("next")
            .with_color(Color::new("blue").expect("color"))
            .with_line(LineStyle::Dotted),
    )
    .expect("arrow");
    body.action("b").expect("b");
    let diagram = diagram.finish().expect("finish");
    let options = RenderOptions::default().with_wrap(false);
    assert_eq!(
        export_diagram(&diagram, &options).expect("export"),
        ":a;\n-[#blue,dotted]-> next;\n:b;\n"
    );
}

#[test]
fn export_is_repeatable() {
    let mut diagram = ActivityDiagram::new();
    let mut body = diagram.body();
    body.start().expect("start");
    body.if_("x?", |decision| decision.action("y")).expect("if");
    let diagram = diagram.finish().expect("finish");
    let first = export_diagram(&diagram, &RenderOptions::default()).expect("first");
    let second = export_diagram(&diagram, &RenderOptions::default()).expect("second");
    assert_eq!(first, second);
}

fn nested_groups(levels: usize) -> ActivityAst {
    let mut nodes = vec![ActivityNode::Action(Action::new("core"))];
    for level in 0..levels {
        nodes = vec![ActivityNode::Group(Group::new(format!("g{level}"), nodes))];
    }
    ActivityAst::new(nodes)
}

#[test]
fn hand_built_trees_at_the_depth_limit_export() {
    let out = export_activity(&nested_groups(MAX_SCOPE_DEPTH), &RenderOptions::default())
        .expect("export");
    assert_eq!(out.matches("end group").count(), MAX_SCOPE_DEPTH);
}

#[test]
fn hand_built_trees_past_the_depth_limit_fail_instead_of_overflowing() {
    let too_deep = RenderError::NestingTooDeep { max: MAX_SCOPE_DEPTH };
    let options = RenderOptions::default();
    let levels = 500;

    let just_past = nested_groups(MAX_SCOPE_DEPTH + 1);
    assert_eq!(export_activity(&just_past, &options), Err(too_deep.clone()));
    assert_eq!(export_activity(&nested_groups(levels), &options), Err(too_deep.clone()));

    let mut nodes = Vec::new();
    for _ in 0..levels {
        let section = SequenceSection::new(None, nodes);
        let block = SequenceBlock::new(SequenceBlockKind::Group, vec![section]);
        nodes = vec![SequenceNode::Block(block)];
    }
    assert_eq!(export_sequence(&SequenceAst::new(nodes), &options), Err(too_deep.clone()));

    let mut nodes = Vec::new();
    for level in 0..levels {
        let state = State::new(Alias::new(format!("S{level}")).expect("alias"));
        let regions = vec![Region::new(nodes)];
        let composite = CompositeState::new(state, RegionSeparator::default(), regions);
        nodes = vec![StateNode::Composite(composite)];
    }
    assert_eq!(export_state(&StateAst::new(nodes), &options), Err(too_deep.clone()));

    let mut nodes = Vec::new();
    for level in 0..levels {
        let package = Package::new(PackageKind::Package, format!("p{level}"), nodes);
        nodes = vec![ClassNode::Package(package)];
    }
    assert_eq!(export_class(&ClassAst::new(nodes), &options), Err(too_deep));
}
