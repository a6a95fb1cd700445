// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::escape::{LABEL, MEMBER, QUOTED, STEREOTYPE};
use super::{check_depth, Writer};
use crate::error::RenderError;
use crate::model::{
    Alias, Class, ClassAst, ClassNode, ClassNote, LabelArrow, Member, Relation,
};

const CLASS: &str = "class";

/// Floating notes are named `__n1`, `__n2` ... in the reserved generated namespace.
const FLOATING_NOTE_PREFIX: &str = "__n";

pub(super) fn write_class(w: &mut Writer, ast: &ClassAst) -> Result<(), RenderError> {
    let mut declared = BTreeSet::new();
    collect_classes(ast.nodes(), &mut declared, 0)?;
    let mut ctx = ClassWriter { declared, floating: 0 };
    ctx.write_nodes(w, ast.nodes())
}

fn collect_classes<'a>(
    nodes: &'a [ClassNode],
    declared: &mut BTreeSet<&'a Alias>,
    depth: usize,
) -> Result<(), RenderError> {
    check_depth(depth)?;
    for node in nodes {
        match node {
            ClassNode::Class(class) => {
                if !declared.insert(class.alias()) {
                    return Err(RenderError::DuplicateDeclaration {
                        node: CLASS,
                        alias: class.alias().clone(),
                    });
                }
            }
            ClassNode::Package(package) => {
                collect_classes(package.children(), declared, depth + 1)?
            }
            ClassNode::Relation(_) | ClassNode::Note(_) => {}
        }
    }
    Ok(())
}

struct ClassWriter<'a> {
    declared: BTreeSet<&'a Alias>,
    floating: u32,
}

impl ClassWriter<'_> {
    fn check<'b>(&self, node: &'static str, alias: &'b Alias) -> Result<&'b str, RenderError> {
        if self.declared.contains(alias) {
            Ok(alias.as_str())
        } else {
            Err(RenderError::MissingReference { node, expected: CLASS, alias: alias.clone() })
        }
    }

    fn write_nodes(&mut self, w: &mut Writer, nodes: &[ClassNode]) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                ClassNode::Class(class) => write_class_decl(w, class),
                ClassNode::Package(package) => {
                    {
                        let mut line = w.line();
                        line.push(package.kind().keyword())
                            .push(" \"")
                            .text(package.name(), QUOTED)
                            .push("\"");
                        if let Some(stereotype) = package.stereotype() {
                            line.push(" <<").text(stereotype, STEREOTYPE).push(">>");
                        }
                        line.color(package.color()).push(" {");
                    }
                    w.indented(|w| self.write_nodes(w, package.children()))?;
                    w.line().push("}");
                }
                ClassNode::Relation(relation) => self.write_relation(w, relation)?,
                ClassNode::Note(note) => self.write_note(w, note)?,
            }
        }
        Ok(())
    }

    fn write_relation(&self, w: &mut Writer, relation: &Relation) -> Result<(), RenderError> {
        let from = self.check("relation", relation.from())?;
        let to = self.check("relation", relation.to())?;
        let (left, body, right) = relation.kind().parts();
        let body = body.encode_utf8(&mut [0; 4]).to_owned();

        let mut line = w.line();
        line.push(from).push(" ");
        if let Some(multiplicity) = relation.from_multiplicity() {
            line.push("\"").text(multiplicity, QUOTED).push("\" ");
        }
        line.push(left).push(&body);
        if let Some(color) = relation.color() {
            line.push("[").color_tight(color).push("]");
        }
        if let Some(direction) = relation.direction() {
            line.push(direction.keyword());
        }
        line.push(&body).push(right).push(" ");
        if let Some(multiplicity) = relation.to_multiplicity() {
            line.push("\"").text(multiplicity, QUOTED).push("\" ");
        }
        line.push(to);
        if let Some(label) = relation.label() {
            line.push(" : ");
            match relation.label_arrow() {
                Some(LabelArrow::Backward) => {
                    line.push("< ").text(label, LABEL);
                }
                Some(LabelArrow::Forward) => {
                    line.text(label, LABEL).push(" >");
                }
                None => {
                    line.text(label, LABEL);
                }
            }
        }
        Ok(())
    }

    fn write_note(&mut self, w: &mut Writer, note: &ClassNote) -> Result<(), RenderError> {
        let multiline = note.text().contains('\n');
        match note.anchor() {
            Some((side, target)) => {
                let target = self.check("note", target)?;
                if multiline {
                    w.note_block(
                        |line| {
                            line.push("note ")
                                .push(side.keyword())
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
                        .push(side.keyword())
                        .push(" of ")
                        .push(target)
                        .color(note.color())
                        .push(" : ")
                        .text(note.text(), LABEL);
                }
            }
            None => {
                self.floating += 1;
                let index = self.floating;
                if multiline {
                    w.note_block(
                        |line| {
                            line.push("note as ")
                                .push(FLOATING_NOTE_PREFIX)
                                .number(index)
                                .color(note.color());
                        },
                        note.text(),
                        "end note",
                    );
                } else {
                    w.line()
                        .push("note \"")
                        .text(note.text(), QUOTED)
                        .push("\" as ")
                        .push(FLOATING_NOTE_PREFIX)
                        .number(index)
                        .color(note.color());
                }
            }
        }
        Ok(())
    }
}

/// `interface "Display" as Alias<T> <<stereotype>> #color { members }`
fn write_class_decl(w: &mut Writer, class: &Class) {
    {
        let mut line = w.line();
        line.push(class.kind().keyword()).push(" ");
        if let Some(display) = class.display() {
            line.push("\"").text(display, QUOTED).push("\" as ");
        }
        line.push(class.alias().as_str());
        if let Some(generic) = class.generic() {
            line.push("<").text(generic, STEREOTYPE).push(">");
        }
        if let Some(stereotype) = class.stereotype() {
            line.push(" <<").text(stereotype, STEREOTYPE).push(">>");
        }
        line.color(class.color());
        if class.members().is_empty() {
            return;
        }
        line.push(" {");
    }
    w.indented(|w| {
        for member in class.members() {
            write_member(w, member);
        }
    });
    w.line().push("}");
}

fn write_member(w: &mut Writer, member: &Member) {
    let mut line = w.line();
    if let Some(modifier) = member.modifier() {
        line.push(modifier.keyword()).push(" ");
    }
    if let Some(visibility) = member.visibility() {
        line.push(visibility.marker().encode_utf8(&mut [0; 4]));
    }
    line.text(member.text(), MEMBER);
}
