// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sequence diagram front-end.

use std::ops::{Deref, DerefMut};

use super::{optional_text, DiagramBuilder, Engine, Grammar, ScopeFrame};
use crate::error::{BuildError, StructuralError, ValidationError};
use crate::model::diagram::{non_empty, single_line};
use crate::model::ids::is_bare_name;
use crate::model::{
    Activation, Alias, Autonumber, Color, DiagramAst, DiagramKind, MessageEnd, NotePlacement,
    NoteShape, ParticipantBox, ParticipantKind, ParticipantList, SequenceArrow, SequenceAst,
    SequenceBlock, SequenceBlockKind, SequenceMessage, SequenceNode, SequenceNote,
    SequenceParticipant, SequenceRef, SequenceSection,
};

const PARTICIPANT: &str = "participant";

const MAX_SPACE: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGrammar;

impl Grammar for SequenceGrammar {
    type Node = SequenceNode;
    type Scope = SequenceScope;
    type Context = Activations;

    const KIND: DiagramKind = DiagramKind::Sequence;

    fn node_kind(node: &SequenceNode) -> &'static str {
        node.kind_name()
    }

    fn into_ast(nodes: Vec<SequenceNode>) -> DiagramAst {
        DiagramAst::Sequence(SequenceAst::new(nodes))
    }
}

/// Participants with an open activation, most recent last.
#[derive(Debug, Clone, Default)]
pub struct Activations {
    open: Vec<Alias>,
}

impl Activations {
    pub fn open(&self) -> &[Alias] {
        &self.open
    }

    fn activate(&mut self, alias: Alias) {
        self.open.push(alias);
    }

    fn deactivate(&mut self, alias: &Alias) {
        if let Some(idx) = self.open.iter().rposition(|open| open == alias) {
            self.open.remove(idx);
        }
    }

    fn destroy(&mut self, alias: &Alias) {
        self.open.retain(|open| open != alias);
    }

    fn track(&mut self, message: &SequenceMessage) {
        match (message.activation(), message.from(), message.to()) {
            (Some(Activation::ActivateTarget), _, MessageEnd::Participant(to)) => {
                self.activate(to.clone())
            }
            (Some(Activation::DeactivateSource), MessageEnd::Participant(from), _) => {
                self.deactivate(from)
            }
            (Some(Activation::DestroyTarget), _, MessageEnd::Participant(to)) => self.destroy(to),
            _ => {}
        }
    }
}

pub type SequenceDiagram = DiagramBuilder<SequenceGrammar>;

impl DiagramBuilder<SequenceGrammar> {
    pub fn body(&mut self) -> SequenceBody<'_> {
        SequenceBody { engine: self.engine_mut() }
    }

    pub fn activations(&self) -> &Activations {
        self.engine().context()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSpec {
    /// Name shown in the diagram; used as the alias when it is a bare identifier.
    pub name: String,
    pub alias: Option<String>,
    pub kind: ParticipantKind,
    pub color: Option<Color>,
    pub order: Option<i32>,
}

impl ParticipantSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn of_kind(kind: ParticipantKind, name: impl Into<String>) -> Self {
        Self { kind, ..Self::new(name) }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

impl From<&str> for ParticipantSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A message between two participants; `None` on either end stands for the diagram border.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSpec {
    pub from: Option<String>,
    pub to: Option<String>,
    pub text: Option<String>,
    pub arrow: SequenceArrow,
    pub activation: Option<Activation>,
}

impl MessageSpec {
    pub fn new(from: impl AsRef<str>, to: impl AsRef<str>) -> Self {
        Self {
            from: Some(from.as_ref().to_owned()),
            to: Some(to.as_ref().to_owned()),
            ..Self::default()
        }
    }

    /// A message entering from the left border (`[->`).
    pub fn incoming(to: impl AsRef<str>) -> Self {
        Self { to: Some(to.as_ref().to_owned()), ..Self::default() }
    }

    /// A message leaving to the right border (`->]`).
    pub fn outgoing(from: impl AsRef<str>) -> Self {
        Self { from: Some(from.as_ref().to_owned()), ..Self::default() }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_arrow(mut self, arrow: SequenceArrow) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    LeftOf(String),
    RightOf(String),
    /// One or two participants.
    Over(Vec<String>),
    Across,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqNoteSpec {
    pub target: NoteTarget,
    pub text: String,
    pub shape: NoteShape,
    pub color: Option<Color>,
}

impl SeqNoteSpec {
    fn with_target(target: NoteTarget, text: impl Into<String>) -> Self {
        Self { target, text: text.into(), shape: NoteShape::Note, color: None }
    }

    pub fn left_of(participant: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self::with_target(NoteTarget::LeftOf(participant.as_ref().to_owned()), text)
    }

    pub fn right_of(participant: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self::with_target(NoteTarget::RightOf(participant.as_ref().to_owned()), text)
    }

    pub fn over<S: AsRef<str>>(participants: &[S], text: impl Into<String>) -> Self {
        let over = participants.iter().map(|p| p.as_ref().to_owned()).collect();
        Self::with_target(NoteTarget::Over(over), text)
    }

    pub fn across(text: impl Into<String>) -> Self {
        Self::with_target(NoteTarget::Across, text)
    }

    pub fn with_shape(mut self, shape: NoteShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub kind: SequenceBlockKind,
    pub label: Option<String>,
}

impl GroupSpec {
    pub fn new(kind: SequenceBlockKind) -> Self {
        Self { kind, label: None }
    }

    pub fn labeled(kind: SequenceBlockKind, label: impl Into<String>) -> Self {
        Self { kind, label: Some(label.into()) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxSpec {
    pub title: Option<String>,
    pub color: Option<Color>,
}

impl BoxSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutonumberSpec {
    pub start: Option<u32>,
    pub step: Option<u32>,
    /// Number format such as `<b>[000]`.
    pub format: Option<String>,
}

impl AutonumberSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// An open sequence construct: a combined fragment (`alt`, `loop`, …) or a participant box.
#[derive(Debug)]
pub enum SequenceScope {
    Block(BlockScope),
    Box(BoxScope),
}

#[derive(Debug)]
pub struct BlockScope {
    kind: SequenceBlockKind,
    sections: Vec<(Option<String>, Vec<SequenceNode>)>,
}

#[derive(Debug)]
pub struct BoxScope {
    title: Option<String>,
    color: Option<Color>,
    participants: Vec<SequenceParticipant>,
}

impl SequenceScope {
    pub fn group(spec: GroupSpec) -> Result<Self, ValidationError> {
        let label = match spec.label {
            Some(label) => Some(single_line(label, "group label")?),
            None => None,
        };
        Ok(Self::Block(BlockScope { kind: spec.kind, sections: vec![(label, Vec::new())] }))
    }

    pub fn box_(spec: BoxSpec) -> Result<Self, ValidationError> {
        let title = match spec.title {
            Some(title) => Some(single_line(title, "box title")?),
            None => None,
        };
        Ok(Self::Box(BoxScope { title, color: spec.color, participants: Vec::new() }))
    }
}

impl ScopeFrame for SequenceScope {
    type Node = SequenceNode;

    fn kind(&self) -> &'static str {
        match self {
            Self::Block(block) => block.kind.keyword(),
            Self::Box(_) => "box",
        }
    }

    fn admits(&self, child: &Self) -> Result<(), &'static str> {
        match (self, child) {
            (Self::Box(_), _) => Err("participants only"),
            (Self::Block(_), Self::Box(_)) => Err("messages, notes and nested groups"),
            (Self::Block(_), Self::Block(_)) => Ok(()),
        }
    }

    fn push(&mut self, node: SequenceNode, call: usize) -> Result<(), StructuralError> {
        match self {
            Self::Block(block) => {
                if let Some((_, children)) = block.sections.last_mut() {
                    children.push(node);
                }
                Ok(())
            }
            Self::Box(scope) => match node {
                SequenceNode::Participant(participant) => {
                    scope.participants.push(participant);
                    Ok(())
                }
                other => Err(StructuralError::Misplaced {
                    what: other.kind_name(),
                    scope: "box",
                    expected: "participants only",
                    call,
                }),
            },
        }
    }

    fn into_node(self, _call: usize) -> Result<SequenceNode, StructuralError> {
        Ok(match self {
            Self::Block(block) => {
                let sections = block
                    .sections
                    .into_iter()
                    .map(|(label, children)| SequenceSection::new(label, children))
                    .collect();
                SequenceNode::Block(SequenceBlock::new(block.kind, sections))
            }
            Self::Box(scope) => {
                SequenceNode::Box(ParticipantBox::new(scope.title, scope.color, scope.participants))
            }
        })
    }
}

fn declare_participant(
    engine: &mut Engine<SequenceGrammar>,
    spec: ParticipantSpec,
    call: usize,
) -> Result<SequenceParticipant, BuildError> {
    let name = single_line(spec.name, "participant name")?;
    let (alias, display) = match spec.alias {
        Some(alias) => {
            let alias = Alias::new(alias)?;
            let display = (name != alias.as_str()).then_some(name);
            (alias, display)
        }
        None if is_bare_name(&name) => (Alias::new(&name)?, None),
        None => (engine.registry_mut().generate("p"), Some(name)),
    };
    engine.registry_mut().declare(alias.clone(), PARTICIPANT, call)?;
    Ok(SequenceParticipant::new(spec.kind, alias)
        .with_display(display)
        .with_color(spec.color)
        .with_order(spec.order))
}

fn resolve(
    engine: &Engine<SequenceGrammar>,
    alias: &str,
    call: usize,
) -> Result<Alias, BuildError> {
    Ok(engine.aliases().require(alias, PARTICIPANT, call)?)
}

fn resolve_list(
    engine: &Engine<SequenceGrammar>,
    aliases: &[String],
    call: usize,
) -> Result<ParticipantList, BuildError> {
    aliases.iter().map(|alias| resolve(engine, alias, call)).collect()
}

fn resolve_end(
    engine: &Engine<SequenceGrammar>,
    end: Option<&str>,
    call: usize,
) -> Result<MessageEnd, BuildError> {
    match end {
        Some(alias) => Ok(MessageEnd::Participant(resolve(engine, alias, call)?)),
        None => Ok(MessageEnd::Border),
    }
}

fn gate_error(option: &'static str, reason: &'static str) -> BuildError {
    ValidationError::IneffectiveOption { option, target: "message", reason }.into()
}

/// Authoring handle valid at the root and inside every combined fragment.
pub struct SequenceBody<'a> {
    engine: &'a mut Engine<SequenceGrammar>,
}

impl SequenceBody<'_> {
    /// Declares a participant and returns the alias messages refer to it by.
    ///
    /// Names that are not bare identifiers get a generated alias.
    pub fn participant(&mut self, spec: impl Into<ParticipantSpec>) -> Result<Alias, BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let participant = declare_participant(engine, spec, call)?;
            let alias = participant.alias().clone();
            engine.append(SequenceNode::Participant(participant), call)?;
            Ok(alias)
        })
    }

    pub fn message(
        &mut self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        text: impl Into<String>,
    ) -> Result<(), BuildError> {
        self.message_with(MessageSpec::new(from, to).with_text(text))
    }

    pub fn message_with(&mut self, spec: MessageSpec) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let from = resolve_end(engine, spec.from.as_deref(), call)?;
            let to = resolve_end(engine, spec.to.as_deref(), call)?;
            if from == MessageEnd::Border && to == MessageEnd::Border {
                return Err(gate_error("border", "at least one end must be a participant"));
            }
            match spec.activation {
                Some(Activation::DeactivateSource) if from == MessageEnd::Border => {
                    return Err(gate_error("activation", "the source is the diagram border"));
                }
                Some(
                    Activation::ActivateTarget
                    | Activation::CreateTarget
                    | Activation::DestroyTarget,
                ) if to == MessageEnd::Border => {
                    return Err(gate_error("activation", "the target is the diagram border"));
                }
                _ => {}
            }
            let text = optional_text(spec.text, "message text")?;
            let message = SequenceMessage::new(from, to, text)
                .with_arrow(spec.arrow)
                .with_activation(spec.activation);
            engine.context_mut().track(&message);
            engine.append(SequenceNode::Message(message), call)
        })
    }

    /// Reply to the caller of the most recent activation, which it closes.
    pub fn return_(&mut self, text: Option<&str>) -> Result<(), BuildError> {
        let text = text.map(str::to_owned);
        self.engine.step(|engine, call| {
            let text = optional_text(text, "return text")?;
            if engine.context().open().is_empty() {
                return Err(StructuralError::Misplaced {
                    what: "return",
                    scope: engine.innermost_kind(),
                    expected: "an active participant",
                    call,
                }
                .into());
            }
            engine.append(SequenceNode::Return(text), call)?;
            engine.context_mut().open.pop();
            Ok(())
        })
    }

    pub fn note(&mut self, spec: SeqNoteSpec) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let placement = match &spec.target {
                NoteTarget::LeftOf(alias) => NotePlacement::LeftOf(resolve(engine, alias, call)?),
                NoteTarget::RightOf(alias) => NotePlacement::RightOf(resolve(engine, alias, call)?),
                NoteTarget::Over(aliases) => {
                    if aliases.is_empty() || aliases.len() > 2 {
                        return Err(ValidationError::OutOfRange {
                            what: "note participants",
                            value: aliases.len() as i64,
                            min: 1,
                            max: 2,
                        }
                        .into());
                    }
                    NotePlacement::Over(resolve_list(engine, aliases, call)?)
                }
                NoteTarget::Across => NotePlacement::Across,
            };
            let text = non_empty(spec.text, "note text")?;
            let note =
                SequenceNote::new(placement, text).with_shape(spec.shape).with_color(spec.color);
            engine.append(SequenceNode::Note(note), call)
        })
    }

    /// `ref over A, B : text`.
    pub fn ref_over<S: AsRef<str>>(
        &mut self,
        participants: &[S],
        text: impl Into<String>,
    ) -> Result<(), BuildError> {
        let aliases: Vec<String> = participants.iter().map(|p| p.as_ref().to_owned()).collect();
        let text = text.into();
        self.engine.step(|engine, call| {
            if aliases.is_empty() {
                return Err(ValidationError::EmptyText { what: "ref participant list" }.into());
            }
            let over: ParticipantList = resolve_list(engine, &aliases, call)?;
            let text = non_empty(text, "ref text")?;
            engine.append(SequenceNode::Ref(SequenceRef::new(over, text)), call)
        })
    }

    pub fn activate(&mut self, participant: &str, color: Option<Color>) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let participant = resolve(engine, participant, call)?;
            engine.context_mut().activate(participant.clone());
            engine.append(SequenceNode::Activate { participant, color }, call)
        })
    }

    pub fn deactivate(&mut self, participant: &str) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let participant = resolve(engine, participant, call)?;
            engine.context_mut().deactivate(&participant);
            engine.append(SequenceNode::Deactivate(participant), call)
        })
    }

    /// Declares a participant at the current point of the timeline.
    pub fn create(&mut self, spec: impl Into<ParticipantSpec>) -> Result<Alias, BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let participant = declare_participant(engine, spec, call)?;
            let alias = participant.alias().clone();
            engine.append(SequenceNode::Create(participant), call)?;
            Ok(alias)
        })
    }

    pub fn destroy(&mut self, participant: &str) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let participant = resolve(engine, participant, call)?;
            engine.context_mut().destroy(&participant);
            engine.append(SequenceNode::Destroy(participant), call)
        })
    }

    /// `== text ==`.
    pub fn divider(&mut self, text: impl Into<String>) -> Result<(), BuildError> {
        let text = text.into();
        self.engine.step(|engine, call| {
            let text = single_line(text, "divider text")?;
            engine.append(SequenceNode::Divider(text), call)
        })
    }

    /// `...` or `...text...`.
    pub fn delay(&mut self, text: Option<&str>) -> Result<(), BuildError> {
        let text = text.map(str::to_owned);
        self.engine.step(|engine, call| {
            let text = match text {
                Some(text) => Some(single_line(text, "delay text")?),
                None => None,
            };
            engine.append(SequenceNode::Delay(text), call)
        })
    }

    /// `|||` or `||pixels||`.
    pub fn space(&mut self, pixels: Option<u32>) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            if let Some(value) = pixels {
                if value == 0 || value > MAX_SPACE {
                    return Err(ValidationError::OutOfRange {
                        what: "space",
                        value: i64::from(value),
                        min: 1,
                        max: i64::from(MAX_SPACE),
                    }
                    .into());
                }
            }
            engine.append(SequenceNode::Space(pixels), call)
        })
    }

    pub fn autonumber(&mut self, spec: AutonumberSpec) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            if spec.step == Some(0) {
                return Err(ValidationError::OutOfRange {
                    what: "autonumber step",
                    value: 0,
                    min: 1,
                    max: i64::from(u32::MAX),
                }
                .into());
            }
            let format = match spec.format {
                Some(format) => Some(single_line(format, "autonumber format")?),
                None => None,
            };
            let node = Autonumber::Start { start: spec.start, step: spec.step, format };
            engine.append(SequenceNode::Autonumber(node), call)
        })
    }

    pub fn autonumber_stop(&mut self) -> Result<(), BuildError> {
        self.engine.leaf(SequenceNode::Autonumber(Autonumber::Stop))
    }

    pub fn autonumber_resume(&mut self) -> Result<(), BuildError> {
        self.engine.leaf(SequenceNode::Autonumber(Autonumber::Resume))
    }

    /// Combined fragment (`alt`, `opt`, `loop`, `par`, `break`, `critical`, `group`).
    pub fn group(
        &mut self,
        spec: GroupSpec,
        body: impl FnOnce(&mut GroupBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        self.engine.scoped(
            |_, _| Ok(SequenceScope::group(spec)?),
            |engine| body(&mut GroupBody { body: SequenceBody { engine } }),
        )
    }

    /// Box around the participants declared inside it.
    pub fn box_(
        &mut self,
        spec: BoxSpec,
        body: impl FnOnce(&mut BoxBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        self.engine
            .scoped(|_, _| Ok(SequenceScope::box_(spec)?), |engine| body(&mut BoxBody { engine }))
    }
}

/// Body of a combined fragment; `else_` starts a new section where the fragment allows it.
pub struct GroupBody<'a> {
    body: SequenceBody<'a>,
}

impl GroupBody<'_> {
    pub fn else_(&mut self, label: Option<&str>) -> Result<(), BuildError> {
        let label = label.map(str::to_owned);
        self.body.engine.step(|engine, call| {
            let label = match label {
                Some(label) => Some(single_line(label, "else label")?),
                None => None,
            };
            let scope = engine.innermost_kind();
            match engine.innermost_mut() {
                Some(SequenceScope::Block(block)) if block.kind.allows_else() => {
                    block.sections.push((label, Vec::new()));
                    Ok(())
                }
                _ => Err(StructuralError::Misplaced {
                    what: "else",
                    scope,
                    expected: "'alt', 'par', 'critical' or 'group'",
                    call,
                }
                .into()),
            }
        })
    }
}

impl<'a> Deref for GroupBody<'a> {
    type Target = SequenceBody<'a>;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl DerefMut for GroupBody<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.body
    }
}

/// Body of a participant box.
pub struct BoxBody<'a> {
    engine: &'a mut Engine<SequenceGrammar>,
}

impl BoxBody<'_> {
    pub fn participant(&mut self, spec: impl Into<ParticipantSpec>) -> Result<Alias, BuildError> {
        SequenceBody { engine: &mut *self.engine }.participant(spec)
    }
}
