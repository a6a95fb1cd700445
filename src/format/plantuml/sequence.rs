// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::escape::{FORMAT, LABEL, QUOTED};
use super::{check_depth, Line, Writer};
use crate::error::RenderError;
use crate::model::{
    Alias, Autonumber, MessageEnd, NotePlacement, SequenceArrow, SequenceAst, SequenceHead,
    SequenceLine, SequenceMessage, SequenceNode, SequenceNote, SequenceParticipant,
};

const PARTICIPANT: &str = "participant";

pub(super) fn write_sequence(w: &mut Writer, ast: &SequenceAst) -> Result<(), RenderError> {
    let mut declared = BTreeSet::new();
    for participant in ast.participants() {
        if !declared.insert(participant.alias()) {
            return Err(RenderError::DuplicateDeclaration {
                node: PARTICIPANT,
                alias: participant.alias().clone(),
            });
        }
    }
    let refs = Refs { declared };
    for node in ast.nodes() {
        write_node(w, node, &refs, 0)?;
    }
    Ok(())
}

struct Refs<'a> {
    declared: BTreeSet<&'a Alias>,
}

impl Refs<'_> {
    fn check<'b>(&self, node: &'static str, alias: &'b Alias) -> Result<&'b str, RenderError> {
        if self.declared.contains(alias) {
            Ok(alias.as_str())
        } else {
            Err(RenderError::MissingReference {
                node,
                expected: PARTICIPANT,
                alias: alias.clone(),
            })
        }
    }

    fn check_all(&self, node: &'static str, aliases: &[Alias]) -> Result<(), RenderError> {
        aliases.iter().try_for_each(|alias| self.check(node, alias).map(drop))
    }
}

fn write_node(
    w: &mut Writer,
    node: &SequenceNode,
    refs: &Refs<'_>,
    depth: usize,
) -> Result<(), RenderError> {
    match node {
        SequenceNode::Participant(participant) => {
            declaration(&mut w.line(), participant);
        }
        SequenceNode::Message(message) => write_message(w, message, refs)?,
        SequenceNode::Return(label) => {
            let mut line = w.line();
            line.push("return");
            if let Some(label) = label {
                line.push(" ").text(label, LABEL);
            }
        }
        SequenceNode::Note(note) => write_note(w, note, refs)?,
        SequenceNode::Ref(reference) => {
            refs.check_all("ref", reference.over())?;
            let over = reference.over().iter().map(Alias::as_str).collect::<Vec<_>>().join(", ");
            if reference.text().contains('\n') {
                w.note_block(
                    |line| {
                        line.push("ref over ").push(&over);
                    },
                    reference.text(),
                    "end ref",
                );
            } else {
                w.line().push("ref over ").push(&over).push(" : ").text(reference.text(), LABEL);
            }
        }
        SequenceNode::Activate { participant, color } => {
            let alias = refs.check("activate", participant)?;
            w.line().push("activate ").push(alias).color(color.as_ref());
        }
        SequenceNode::Deactivate(participant) => {
            let alias = refs.check("deactivate", participant)?;
            w.line().push("deactivate ").push(alias);
        }
        SequenceNode::Create(participant) => {
            let mut line = w.line();
            line.push("create ");
            declaration(&mut line, participant);
        }
        SequenceNode::Destroy(participant) => {
            let alias = refs.check("destroy", participant)?;
            w.line().push("destroy ").push(alias);
        }
        SequenceNode::Block(block) => {
            check_depth(depth + 1)?;
            for (idx, section) in block.sections().iter().enumerate() {
                {
                    let mut line = w.line();
                    line.push(if idx == 0 { block.kind().keyword() } else { "else" });
                    if let Some(label) = section.label() {
                        line.push(" ").text(label, LABEL);
                    }
                }
                w.indented(|w| {
                    section
                        .children()
                        .iter()
                        .try_for_each(|child| write_node(w, child, refs, depth + 1))
                })?;
            }
            w.line().push("end");
        }
        SequenceNode::Box(group) => {
            {
                let mut line = w.line();
                line.push("box");
                if let Some(title) = group.title() {
                    line.push(" \"").text(title, QUOTED).push("\"");
                }
                line.color(group.color());
            }
            w.indented(|w| {
                for participant in group.participants() {
                    declaration(&mut w.line(), participant);
                }
            });
            w.line().push("end box");
        }
        SequenceNode::Divider(text) => {
            w.line().push("== ").text(text, LABEL).push(" ==");
        }
        SequenceNode::Delay(text) => {
            let mut line = w.line();
            line.push("...");
            if let Some(text) = text {
                line.text(text, LABEL).push("...");
            }
        }
        SequenceNode::Space(height) => {
            let mut line = w.line();
            match height {
                Some(height) => line.push("||").number(*height).push("||"),
                None => line.push("|||"),
            };
        }
        SequenceNode::Autonumber(autonumber) => {
            let mut line = w.line();
            line.push("autonumber");
            match autonumber {
                Autonumber::Start { start, step, format } => {
                    if start.is_some() || step.is_some() {
                        line.push(" ").number(start.unwrap_or(1));
                    }
                    if let Some(step) = step {
                        line.push(" ").number(*step);
                    }
                    if let Some(format) = format {
                        line.push(" \"").text(format, FORMAT).push("\"");
                    }
                }
                Autonumber::Stop => {
                    line.push(" stop");
                }
                Autonumber::Resume => {
                    line.push(" resume");
                }
            }
        }
    }
    Ok(())
}

/// `actor "Display" as Alias order 10 #color`
fn declaration(line: &mut Line<'_>, participant: &SequenceParticipant) {
    line.push(participant.kind().keyword()).push(" ");
    if let Some(display) = participant.display() {
        line.push("\"").text(display, QUOTED).push("\" as ");
    }
    line.push(participant.alias().as_str());
    if let Some(order) = participant.order() {
        line.push(" order ").number(order);
    }
    line.color(participant.color());
}

fn write_message(
    w: &mut Writer,
    message: &SequenceMessage,
    refs: &Refs<'_>,
) -> Result<(), RenderError> {
    let from = match message.from() {
        MessageEnd::Participant(alias) => Some(refs.check("message", alias)?),
        MessageEnd::Border => None,
    };
    let to = match message.to() {
        MessageEnd::Participant(alias) => Some(refs.check("message", alias)?),
        MessageEnd::Border => None,
    };

    let mut line = w.line();
    match from {
        Some(alias) => line.push(alias).push(" "),
        None => line.push("["),
    };
    arrow(&mut line, message.arrow());
    match to {
        Some(alias) => line.push(" ").push(alias),
        None => line.push("]"),
    };
    if let Some(activation) = message.activation() {
        line.push(" ").push(activation.token());
    }
    if let Some(text) = message.text() {
        line.push(" : ").text(text, LABEL);
    }
    Ok(())
}

fn arrow(line: &mut Line<'_>, arrow: &SequenceArrow) {
    if arrow.bidirectional() {
        line.push(match arrow.head() {
            SequenceHead::Filled => "<",
            SequenceHead::Thin => "<<",
            SequenceHead::Lost => "x",
            SequenceHead::UpperHalf => "/",
            SequenceHead::LowerHalf => "\\",
            SequenceHead::Circle => "o<",
        });
    }
    line.push("-");
    if let Some(color) = arrow.color() {
        line.push("[").color_tight(color).push("]");
    }
    if arrow.line() == SequenceLine::Dotted {
        line.push("-");
    }
    line.push(match arrow.head() {
        SequenceHead::Filled => ">",
        SequenceHead::Thin => ">>",
        SequenceHead::Lost => "x",
        SequenceHead::UpperHalf => "\\",
        SequenceHead::LowerHalf => "/",
        SequenceHead::Circle => ">o",
    });
}

fn write_note(w: &mut Writer, note: &SequenceNote, refs: &Refs<'_>) -> Result<(), RenderError> {
    let mut placement = String::new();
    match note.placement() {
        NotePlacement::LeftOf(alias) => {
            placement.push_str(" left of ");
            placement.push_str(refs.check("note", alias)?);
        }
        NotePlacement::RightOf(alias) => {
            placement.push_str(" right of ");
            placement.push_str(refs.check("note", alias)?);
        }
        NotePlacement::Over(aliases) => {
            refs.check_all("note", aliases)?;
            placement.push_str(" over ");
            let names = aliases.iter().map(Alias::as_str).collect::<Vec<_>>();
            placement.push_str(&names.join(", "));
        }
        NotePlacement::Across => placement.push_str(" across"),
    }

    let keyword = note.shape().keyword();
    if note.text().contains('\n') {
        let closing = format!("end {keyword}");
        w.note_block(
            |line| {
                line.push(keyword).push(&placement).color(note.color());
            },
            note.text(),
            &closing,
        );
    } else {
        w.line()
            .push(keyword)
            .push(&placement)
            .color(note.color())
            .push(" : ")
            .text(note.text(), LABEL);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::build::sequence::{
        AutonumberSpec, BoxSpec, GroupSpec, MessageSpec, ParticipantSpec, SeqNoteSpec,
    };
    use crate::build::SequenceDiagram;
    use crate::config::RenderOptions;
    use crate::error::RenderError;
    use crate::format::plantuml::{export_diagram, export_sequence};
    use crate::model::{
        Activation, Alias, MessageEnd, ParticipantKind, SequenceArrow, SequenceAst,
        SequenceBlockKind, SequenceHead, SequenceLine, SequenceMessage, SequenceNode,
    };

    fn render(diagram: SequenceDiagram) -> String {
        let diagram = diagram.finish().expect("finish");
        export_diagram(&diagram, &RenderOptions::default()).expect("export")
    }

    #[test]
    fn participants_messages_and_returns() {
        let mut diagram = SequenceDiagram::new();
        let mut body = diagram.body();
        let user = body
            .participant(ParticipantSpec::of_kind(ParticipantKind::Actor, "User"))
            .expect("user");
        let shop = body.participant(ParticipantSpec::new("Web Shop")).expect("shop");
        body.message_with(
            MessageSpec::new(user.as_str(), shop.as_str())
                .with_text("order")
                .with_activation(Activation::ActivateTarget),
        )
        .expect("message");
        body.return_(Some("ok")).expect("return");
        body.message_with(
            MessageSpec::outgoing(shop.as_str())
                .with_text("audit")
                .with_arrow(SequenceArrow::new(SequenceLine::Dotted, SequenceHead::Thin)),
        )
        .expect("outgoing");
        let expected = "\
@startuml
actor User
participant \"Web Shop\" as __p1
User -> __p1 ++ : order
return ok
__p1 -->>] : audit
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn autonumber_format_keeps_markup_but_labels_do_not() {
        let mut diagram = SequenceDiagram::new();
        let mut body = diagram.body();
        body.participant("A").expect("participant");
        body.autonumber(AutonumberSpec::new().with_format("<b>[000]")).expect("autonumber");
        body.message("A", "A", "<color:red>alert [[http://x]]").expect("message");
        let expected = "\
@startuml
participant A
autonumber \"<b>[000]\"
A -> A : ~<color:red>alert ~[~[http:~/~/x]]
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn groups_boxes_and_notes() {
        let mut diagram = SequenceDiagram::new();
        let mut body = diagram.body();
        body.box_(BoxSpec::new().with_title("Backend"), |group| {
            group.participant("Api").map(drop)?;
            group.participant("Db").map(drop)
        })
        .expect("box");
        body.autonumber(AutonumberSpec::new().starting_at(10).with_step(5)).expect("autonumber");
        body.group(GroupSpec::labeled(SequenceBlockKind::Alt, "cached"), |alt| {
            alt.message("Api", "Api", "hit")?;
            alt.else_(Some("miss"))?;
            alt.message("Api", "Db", "select")?;
            alt.note(SeqNoteSpec::over(&["Api", "Db"], "slow path"))
        })
        .expect("alt");
        body.divider("done").expect("divider");
        body.delay(None).expect("delay");
        body.space(Some(20)).expect("space");
        let expected = "\
@startuml
box \"Backend\"
  participant Api
  participant Db
end box
autonumber 10 5
alt cached
  Api -> Api : hit
else miss
  Api -> Db : select
  note over Api, Db : slow path
end
== done ==
...
||20||
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn multiline_notes_use_blocks() {
        let mut diagram = SequenceDiagram::new();
        let mut body = diagram.body();
        body.participant("A").expect("participant");
        body.note(SeqNoteSpec::right_of("A", "first\nsecond")).expect("note");
        let expected = "\
@startuml
participant A
note right of A
  first
  second
end note
@enduml
";
        assert_eq!(render(diagram), expected);
    }

    #[test]
    fn hand_built_tree_must_declare_participants() {
        let ghost = Alias::new("Ghost").expect("alias");
        let message =
            SequenceMessage::new(MessageEnd::Border, MessageEnd::Participant(ghost.clone()), None);
        let ast = SequenceAst::new(vec![SequenceNode::Message(message)]);
        assert_eq!(
            export_sequence(&ast, &RenderOptions::default()),
            Err(RenderError::MissingReference {
                node: "message",
                expected: "participant",
                alias: ghost,
            })
        );
    }
}
