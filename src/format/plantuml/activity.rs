// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::escape::{ACTION, LABEL, PAREN, PIPE, QUOTED};
use super::{check_depth, Writer};
use crate::error::RenderError;
use crate::model::{
    ActivityAst, ActivityNode, ActivityNote, Alias, Decision, ForkEnd, NoteSide, Parallel,
    ParallelKind, RepeatLoop,
};

pub(super) fn write_activity(w: &mut Writer, ast: &ActivityAst) -> Result<(), RenderError> {
    let mut labels = BTreeSet::new();
    collect_labels(ast.nodes(), &mut labels, 0)?;
    write_nodes(w, ast.nodes(), &labels)
}

fn collect_labels<'a>(
    nodes: &'a [ActivityNode],
    labels: &mut BTreeSet<&'a Alias>,
    depth: usize,
) -> Result<(), RenderError> {
    check_depth(depth)?;
    let inner = depth + 1;
    for node in nodes {
        match node {
            ActivityNode::Label(alias) => {
                if !labels.insert(alias) {
                    return Err(RenderError::DuplicateDeclaration {
                        node: "label",
                        alias: alias.clone(),
                    });
                }
            }
            ActivityNode::Decision(decision) => {
                collect_labels(decision.then().children(), labels, inner)?;
                for branch in decision.elseifs() {
                    collect_labels(branch.children(), labels, inner)?;
                }
                if let Some(otherwise) = decision.otherwise() {
                    collect_labels(otherwise.children(), labels, inner)?;
                }
            }
            ActivityNode::Switch(switch) => {
                for case in switch.cases() {
                    collect_labels(case.children(), labels, inner)?;
                }
            }
            ActivityNode::While(lp) => collect_labels(lp.children(), labels, inner)?,
            ActivityNode::Repeat(lp) => collect_labels(lp.children(), labels, inner)?,
            ActivityNode::Parallel(parallel) => {
                for branch in parallel.branches() {
                    collect_labels(branch.children(), labels, inner)?;
                }
            }
            ActivityNode::Partition(partition) => {
                collect_labels(partition.children(), labels, inner)?
            }
            ActivityNode::Group(group) => collect_labels(group.children(), labels, inner)?,
            _ => {}
        }
    }
    Ok(())
}

fn write_nodes(
    w: &mut Writer,
    nodes: &[ActivityNode],
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    for node in nodes {
        write_node(w, node, labels)?;
    }
    Ok(())
}

fn write_body(
    w: &mut Writer,
    nodes: &[ActivityNode],
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    w.indented(|w| write_nodes(w, nodes, labels))
}

fn write_node(
    w: &mut Writer,
    node: &ActivityNode,
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    match node {
        ActivityNode::Start
        | ActivityNode::Stop
        | ActivityNode::End
        | ActivityNode::Kill
        | ActivityNode::Detach
        | ActivityNode::Break => {
            w.line().push(node.kind_name());
        }
        ActivityNode::Action(action) => {
            let mut line = w.line();
            if let Some(color) = action.color() {
                line.color_tight(color);
            }
            let terminator = action.shape().terminator();
            line.push(":").text(action.text(), ACTION).push(terminator.encode_utf8(&mut [0; 4]));
        }
        ActivityNode::Decision(decision) => write_decision(w, decision, labels)?,
        ActivityNode::Switch(switch) => {
            w.line().push("switch (").text(switch.test(), PAREN).push(")");
            for case in switch.cases() {
                w.line().push("case (").text(case.label(), PAREN).push(")");
                write_body(w, case.children(), labels)?;
            }
            w.line().push("endswitch");
        }
        ActivityNode::While(lp) => {
            {
                let mut line = w.line();
                line.push("while (").text(lp.condition(), PAREN).push(")");
                if let Some(label) = lp.is_label() {
                    line.push(" is (").text(label, PAREN).push(")");
                }
            }
            write_body(w, lp.children(), labels)?;
            let mut line = w.line();
            line.push("endwhile");
            if let Some(label) = lp.exit_label() {
                line.push(" (").text(label, PAREN).push(")");
            }
        }
        ActivityNode::Repeat(lp) => write_repeat(w, lp, labels)?,
        ActivityNode::Parallel(parallel) => write_parallel(w, parallel, labels)?,
        ActivityNode::Partition(partition) => {
            w.line()
                .push("partition")
                .color(partition.color())
                .push(" \"")
                .text(partition.name(), QUOTED)
                .push("\" {");
            write_body(w, partition.children(), labels)?;
            w.line().push("}");
        }
        ActivityNode::Group(group) => {
            w.line().push("group ").text(group.name(), LABEL);
            write_body(w, group.children(), labels)?;
            w.line().push("end group");
        }
        ActivityNode::Swimlane(lane) => {
            let mut line = w.line();
            line.push("|");
            if let Some(color) = lane.color() {
                line.color_tight(color).push("|");
            }
            line.text(lane.name(), PIPE).push("|");
            if let Some(label) = lane.label() {
                line.push(" ").text(label, LABEL);
            }
        }
        ActivityNode::Connector(name) => {
            w.line().push("(").text(name, PAREN).push(")");
        }
        ActivityNode::Label(alias) => {
            w.line().push("label ").push(alias.as_str());
        }
        ActivityNode::Goto(alias) => {
            if !labels.contains(alias) {
                return Err(RenderError::MissingReference {
                    node: "goto",
                    expected: "label",
                    alias: alias.clone(),
                });
            }
            w.line().push("goto ").push(alias.as_str());
        }
        ActivityNode::Note(note) => write_note(w, note),
        ActivityNode::Arrow(arrow) => {
            let mut line = w.line();
            line.push("-").link_style(arrow.style()).push("->");
            if let Some(label) = arrow.label() {
                line.push(" ").text(label, ACTION);
            }
            line.push(";");
        }
    }
    Ok(())
}

fn write_decision(
    w: &mut Writer,
    decision: &Decision,
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    let then = decision.then();
    {
        let mut line = w.line();
        line.push("if (").text(then.condition(), PAREN).push(") then");
        if let Some(label) = then.label() {
            line.push(" (").text(label, PAREN).push(")");
        }
    }
    write_body(w, then.children(), labels)?;
    for branch in decision.elseifs() {
        {
            let mut line = w.line();
            line.push("elseif (").text(branch.condition(), PAREN).push(") then");
            if let Some(label) = branch.label() {
                line.push(" (").text(label, PAREN).push(")");
            }
        }
        write_body(w, branch.children(), labels)?;
    }
    if let Some(otherwise) = decision.otherwise() {
        {
            let mut line = w.line();
            line.push("else");
            if let Some(label) = otherwise.label() {
                line.push(" (").text(label, PAREN).push(")");
            }
        }
        write_body(w, otherwise.children(), labels)?;
    }
    w.line().push("endif");
    Ok(())
}

fn write_repeat(
    w: &mut Writer,
    lp: &RepeatLoop,
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    {
        let mut line = w.line();
        line.push("repeat");
        if let Some(start) = lp.start() {
            line.push(" :").text(start, ACTION).push(";");
        }
    }
    write_body(w, lp.children(), labels)?;
    if let Some(backward) = lp.backward() {
        w.indented(|w| {
            w.line().push("backward :").text(backward, ACTION).push(";");
        });
    }
    let mut line = w.line();
    line.push("repeat while (").text(lp.condition(), PAREN).push(")");
    if let Some(label) = lp.is_label() {
        line.push(" is (").text(label, PAREN).push(")");
    }
    if let Some(label) = lp.not_label() {
        line.push(" not (").text(label, PAREN).push(")");
    }
    Ok(())
}

fn write_parallel(
    w: &mut Writer,
    parallel: &Parallel,
    labels: &BTreeSet<&Alias>,
) -> Result<(), RenderError> {
    let (open, again) = match parallel.kind() {
        ParallelKind::Fork { .. } => ("fork", "fork again"),
        ParallelKind::Split => ("split", "split again"),
    };
    w.line().push(open);
    for (idx, branch) in parallel.branches().iter().enumerate() {
        if idx > 0 {
            w.line().push(again);
        }
        write_body(w, branch.children(), labels)?;
    }
    let mut line = w.line();
    match parallel.kind() {
        ParallelKind::Fork { end: ForkEnd::Fork } => {
            line.push("end fork");
        }
        ParallelKind::Fork { end: ForkEnd::Merge } => {
            line.push("end merge");
        }
        ParallelKind::Fork { end: ForkEnd::Join(label) } => {
            line.push("end fork {").text(label, LABEL).push("}");
        }
        ParallelKind::Split => {
            line.push("end split");
        }
    }
    Ok(())
}

fn write_note(w: &mut Writer, note: &ActivityNote) {
    let side = match note.side() {
        NoteSide::Left => "left",
        NoteSide::Right => "right",
    };
    let floating = if note.floating() { "floating " } else { "" };
    if note.text().contains('\n') {
        w.note_block(
            |line| {
                line.push(floating).push("note ").push(side).color(note.color());
            },
            note.text(),
            "end note",
        );
    } else {
        w.line()
            .push(floating)
            .push("note ")
            .push(side)
            .color(note.color())
            .push(" : ")
            .text(note.text(), LABEL);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::build::activity::{ActionSpec, IfSpec, NoteSpec, RepeatSpec, SwimlaneSpec, WhileSpec};
    use crate::build::ActivityDiagram;
    use crate::config::RenderOptions;
    use crate::error::RenderError;
    use crate::format::plantuml::{export_activity, export_diagram};
    use crate::model::{ActionShape, ActivityAst, ActivityNode, Alias, Color};

    fn render(diagram: ActivityDiagram) -> String {
        let diagram = diagram.finish().expect("finish");
        export_diagram(&diagram, &RenderOptions::default()).expect("export")
    }

    #[test]
    fn linear_flow() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        body.start().expect("start");
        body.action("Hello; world").expect("action");
        body.action_with(ActionSpec::new("Ship it").with_shape(ActionShape::Send)).expect("send");
        body.stop().expect("stop");
        assert_eq!(
            render(diagram),
            "@startuml\nstart\n:Hello; world;\n:Ship it>\nstop\n@enduml\n"
        );
    }

    #[test]
    fn decision_with_branches_in_order() {
        let mut diagram = ActivityDiagram::new();
        diagram
            .body()
            .if_(IfSpec::new("paid?").with_label("yes"), |decision| {
                decision.action("ship")?;
                decision.elseif(IfSpec::new("trial?").with_label("maybe"))?;
                decision.action("remind")?;
                decision.else_(Some("no"))?;
                decision.action("cancel")
            })
            .expect("if");
        let expected = "\
@startuml
if (paid?) then (yes)
  :ship;
elseif (trial?) then (maybe)
  :remind;
else (no)
  :cancel;
endif
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn loops_and_break() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        body.while_(WhileSpec::new("more?").with_labels("yes", "no"), |lp| {
            lp.if_("done?", |decision| decision.break_())?;
            lp.action("work")
        })
        .expect("while");
        body.repeat(RepeatSpec::new("again?").with_start("prepare"), |lp| {
            lp.action("try")?;
            lp.backward("wait")
        })
        .expect("repeat");
        let expected = "\
@startuml
while (more?) is (yes)
  if (done?) then
    break
  endif
  :work;
endwhile (no)
repeat :prepare;
  :try;
  backward :wait;
repeat while (again?)
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn fork_variants() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        body.fork(|fork| {
            fork.branch(|branch| branch.action("A"))?;
            fork.branch(|branch| branch.action("B"))?;
            fork.end_join("and")
        })
        .expect("fork");
        body.fork(|_| Ok(())).expect("empty fork");
        body.split(|split| split.branch(|branch| branch.action("C"))).expect("split");
        let expected = "\
@startuml
fork
  :A;
fork again
  :B;
end fork {and}
fork
end fork
split
  :C;
end split
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn lanes_notes_and_partitions() {
        let mut diagram = ActivityDiagram::new();
        let red = Color::new("red").expect("color");
        let mut body = diagram.body();
        body.swimlane(SwimlaneSpec::new("Shop").with_color(red.clone())).expect("lane");
        body.partition("Checkout", |part| {
            part.action_with(ActionSpec::new("pay").with_color(red.clone()))?;
            part.note(NoteSpec::right("first line\nend of story"))
        })
        .expect("partition");
        body.note(NoteSpec::left("**done**").floating()).expect("note");
        let expected = "\
@startuml
|#red|Shop|
partition \"Checkout\" {
  #red:pay;
  note right
    first line
    ~end of story
  end note
}
floating note left : ~*~*done~*~*
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn goto_requires_a_label_in_the_tree() {
        let alias = Alias::new("retry").expect("alias");
        let ast = ActivityAst::new(vec![ActivityNode::Goto(alias.clone())]);
        assert_eq!(
            export_activity(&ast, &RenderOptions::default()),
            Err(RenderError::MissingReference { node: "goto", expected: "label", alias })
        );
    }
}
