// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::escape::{LABEL, QUOTED};
use super::{check_depth, Line, Writer};
use crate::error::RenderError;
use crate::model::{Alias, State, StateAst, StateEndpoint, StateNode, Transition};

const STATE: &str = "state";

pub(super) fn write_state(w: &mut Writer, ast: &StateAst) -> Result<(), RenderError> {
    let mut declared = BTreeSet::new();
    collect_states(ast.nodes(), &mut declared, 0)?;
    write_nodes(w, ast.nodes(), &declared)
}

fn collect_states<'a>(
    nodes: &'a [StateNode],
    declared: &mut BTreeSet<&'a Alias>,
    depth: usize,
) -> Result<(), RenderError> {
    check_depth(depth)?;
    for node in nodes {
        let state = match node {
            StateNode::State(state) => state,
            StateNode::Composite(composite) => {
                for region in composite.regions() {
                    collect_states(region.children(), declared, depth + 1)?;
                }
                composite.state()
            }
            StateNode::Transition(_) | StateNode::Note(_) => continue,
        };
        if !declared.insert(state.alias()) {
            return Err(RenderError::DuplicateDeclaration {
                node: STATE,
                alias: state.alias().clone(),
            });
        }
    }
    Ok(())
}

fn check<'b>(
    declared: &BTreeSet<&Alias>,
    node: &'static str,
    alias: &'b Alias,
) -> Result<&'b str, RenderError> {
    if declared.contains(alias) {
        Ok(alias.as_str())
    } else {
        Err(RenderError::MissingReference { node, expected: STATE, alias: alias.clone() })
    }
}

fn write_nodes(
    w: &mut Writer,
    nodes: &[StateNode],
    declared: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            StateNode::State(state) => {
                header(&mut w.line(), state);
                describe(w, state);
            }
            StateNode::Composite(composite) => {
                {
                    let mut line = w.line();
                    header(&mut line, composite.state());
                    line.push(" {");
                }
                let separator = composite.separator().token();
                for (idx, region) in composite.regions().iter().enumerate() {
                    if idx > 0 {
                        w.indented(|w| {
                            w.line().push(separator);
                        });
                    }
                    w.indented(|w| write_nodes(w, region.children(), declared))?;
                }
                w.line().push("}");
                describe(w, composite.state());
            }
            StateNode::Transition(transition) => write_transition(w, transition, declared)?,
            StateNode::Note(note) => {
                let target = check(declared, "note", note.target())?;
                let side = note.side().keyword();
                if note.text().contains('\n') {
                    w.note_block(
                        |line| {
                            line.push("note ")
                                .push(side)
                                .push(" of ")
                                .push(target)
                                .color(note.color());
                        },
                        note.text(),
                        "end note",
                    );
                } else {
                    w.line()
                        .push("note ")
                        .push(side)
                        .push(" of ")
                        .push(target)
                        .color(note.color())
                        .push(" : ")
                        .text(note.text(), LABEL);
                }
            }
        }
    }
    Ok(())
}

/// `state "Display" as alias <<choice>> #color`
fn header(line: &mut Line<'_>, state: &State) {
    line.push("state ");
    if let Some(display) = state.display() {
        line.push("\"").text(display, QUOTED).push("\" as ");
    }
    line.push(state.alias().as_str());
    if let Some(stereotype) = state.kind().stereotype() {
        line.push(" <<").push(stereotype).push(">>");
    }
    line.color(state.color());
}

fn describe(w: &mut Writer, state: &State) {
    for text in state.description() {
        w.line().push(state.alias().as_str()).push(" : ").text(text, LABEL);
    }
}

fn endpoint<'a>(
    declared: &BTreeSet<&Alias>,
    end: &'a StateEndpoint,
) -> Result<&'a str, RenderError> {
    match end {
        StateEndpoint::Terminal => Ok("[*]"),
        StateEndpoint::History => Ok("[H]"),
        StateEndpoint::DeepHistory => Ok("[H*]"),
        StateEndpoint::State(alias) => check(declared, "transition", alias),
    }
}

fn write_transition(
    w: &mut Writer,
    transition: &Transition,
    declared: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    let from = endpoint(declared, transition.from())?;
    let to = endpoint(declared, transition.to())?;
    let mut line = w.line();
    line.push(from).push(" -").link_style(transition.style());
    if let Some(direction) = transition.direction() {
        line.push(direction.keyword());
    }
    line.push("-> ").push(to);
    if let Some(label) = transition.label() {
        line.push(" : ").text(label, LABEL);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::build::state::{StateSpec, TransitionSpec};
    use crate::build::StateDiagram;
    use crate::config::RenderOptions;
    use crate::error::RenderError;
    use crate::format::plantuml::{export_diagram, export_state};
    use crate::model::{
        Alias, Color, Direction, LineStyle, RegionSeparator, Side, StateAst, StateEndpoint,
        StateKind, StateNode, Transition,
    };

    fn render(diagram: StateDiagram) -> String {
        let diagram = diagram.finish().expect("finish");
        export_diagram(&diagram, &RenderOptions::default()).expect("export")
    }

    #[test]
    fn states_transitions_and_pseudo_states() {
        let mut diagram = StateDiagram::new();
        let mut body = diagram.body();
        let idle = body.state(StateSpec::new("Idle").describe("waiting")).expect("idle");
        let check = body
            .state(StateSpec::new("check").with_kind(StateKind::Choice))
            .expect("choice");
        let busy = body.state("Busy working").expect("busy");
        body.transition("[*]", &idle, TransitionSpec::new()).expect("t1");
        body.transition(&idle, &check, "poll").expect("t2");
        body.transition(
            &check,
            &busy,
            TransitionSpec::new()
                .with_direction(Direction::Right)
                .with_color(Color::new("red").expect("color"))
                .with_line(LineStyle::Dashed),
        )
        .expect("t3");
        body.note(Side::Left, "Idle", "quiet", None).expect("note");
        let expected = "\
@startuml
state Idle
Idle : waiting
state check <<choice>>
state \"Busy working\" as __s1
[*] --> Idle
Idle --> check : poll
check -[#red,dashed]right-> __s1
note left of Idle : quiet
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn composite_regions_are_separated() {
        let mut diagram = StateDiagram::new();
        diagram
            .body()
            .composite("Active", |active| {
                active.state("Reading")?;
                active.region(RegionSeparator::Vertical)?;
                active.state("Writing")?;
                active.transition("Writing", "[H]", TransitionSpec::new())
            })
            .expect("composite");
        diagram.body().composite("Empty", |_| Ok(())).expect("empty composite");
        let expected = "\
@startuml
state Active {
  state Reading
  ||
  state Writing
  Writing --> [H]
}
state Empty {
}
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn hand_built_transition_needs_declared_states() {
        let lost = Alias::new("Lost").expect("alias");
        let transition =
            Transition::new(StateEndpoint::Terminal, StateEndpoint::State(lost.clone()));
        let ast = StateAst::new(vec![StateNode::Transition(transition)]);
        assert_eq!(
            export_state(&ast, &RenderOptions::default()),
            Err(RenderError::MissingReference {
                node: "transition",
                expected: "state",
                alias: lost,
            })
        );
    }
}
