// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::ids::Alias;
use super::style::Color;

/// Participants listed by a note or reference (`over A, B`).
pub type ParticipantList = SmallVec<[Alias; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceAst {
    nodes: Vec<SequenceNode>,
}

impl SequenceAst {
    pub fn new(nodes: Vec<SequenceNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[SequenceNode] {
        &self.nodes
    }

    /// Participants in declaration order, including those declared inside boxes.
    pub fn participants(&self) -> Vec<&SequenceParticipant> {
        let mut out = Vec::new();
        // Walked with an explicit stack so arbitrarily deep hand-built trees cannot overflow.
        let mut pending = vec![self.nodes.iter()];
        while let Some(nodes) = pending.last_mut() {
            let Some(node) = nodes.next() else {
                pending.pop();
                continue;
            };
            match node {
                SequenceNode::Participant(participant) | SequenceNode::Create(participant) => {
                    out.push(participant)
                }
                SequenceNode::Box(group) => out.extend(group.participants()),
                SequenceNode::Block(block) => {
                    pending.extend(block.sections().iter().rev().map(|s| s.children().iter()));
                }
                _ => {}
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceNode {
    Participant(SequenceParticipant),
    Message(SequenceMessage),
    Return(Option<String>),
    Note(SequenceNote),
    Ref(SequenceRef),
    Activate { participant: Alias, color: Option<Color> },
    Deactivate(Alias),
    /// Participant declared at this point of the timeline (`create`).
    Create(SequenceParticipant),
    Destroy(Alias),
    Block(SequenceBlock),
    Box(ParticipantBox),
    Divider(String),
    Delay(Option<String>),
    Space(Option<u32>),
    Autonumber(Autonumber),
}

impl SequenceNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Participant(_) => "participant",
            Self::Message(_) => "message",
            Self::Return(_) => "return",
            Self::Note(_) => "note",
            Self::Ref(_) => "ref",
            Self::Activate { .. } => "activate",
            Self::Deactivate(_) => "deactivate",
            Self::Create(_) => "create",
            Self::Destroy(_) => "destroy",
            Self::Block(block) => block.kind().keyword(),
            Self::Box(_) => "box",
            Self::Divider(_) => "divider",
            Self::Delay(_) => "delay",
            Self::Space(_) => "space",
            Self::Autonumber(_) => "autonumber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticipantKind {
    #[default]
    Participant,
    Actor,
    Boundary,
    Control,
    Entity,
    Database,
    Collections,
    Queue,
}

impl ParticipantKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Actor => "actor",
            Self::Boundary => "boundary",
            Self::Control => "control",
            Self::Entity => "entity",
            Self::Database => "database",
            Self::Collections => "collections",
            Self::Queue => "queue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceParticipant {
    kind: ParticipantKind,
    alias: Alias,
    display: Option<String>,
    color: Option<Color>,
    order: Option<i32>,
}

impl SequenceParticipant {
    pub fn new(kind: ParticipantKind, alias: Alias) -> Self {
        Self { kind, alias, display: None, color: None, order: None }
    }

    pub fn with_display(mut self, display: Option<String>) -> Self {
        self.display = display;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_order(mut self, order: Option<i32>) -> Self {
        self.order = order;
        self
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Display name shown instead of the alias.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn order(&self) -> Option<i32> {
        self.order
    }
}

/// One side of a message: a participant or the diagram border (`[` / `]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEnd {
    Participant(Alias),
    Border,
}

impl MessageEnd {
    pub fn participant(&self) -> Option<&Alias> {
        match self {
            Self::Participant(alias) => Some(alias),
            Self::Border => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceLine {
    #[default]
    Solid,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceHead {
    #[default]
    Filled,
    Thin,
    Lost,
    UpperHalf,
    LowerHalf,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceArrow {
    line: SequenceLine,
    head: SequenceHead,
    bidirectional: bool,
    color: Option<Color>,
}

impl SequenceArrow {
    pub fn new(line: SequenceLine, head: SequenceHead) -> Self {
        Self { line, head, bidirectional: false, color: None }
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn line(&self) -> SequenceLine {
        self.line
    }

    pub fn head(&self) -> SequenceHead {
        self.head
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// Lifeline shorthand written after the target: `++`, `--`, `**`, `!!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    ActivateTarget,
    DeactivateSource,
    CreateTarget,
    DestroyTarget,
}

impl Activation {
    pub fn token(self) -> &'static str {
        match self {
            Self::ActivateTarget => "++",
            Self::DeactivateSource => "--",
            Self::CreateTarget => "**",
            Self::DestroyTarget => "!!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMessage {
    from: MessageEnd,
    to: MessageEnd,
    arrow: SequenceArrow,
    text: Option<String>,
    activation: Option<Activation>,
}

impl SequenceMessage {
    pub fn new(from: MessageEnd, to: MessageEnd, text: Option<String>) -> Self {
        Self { from, to, arrow: SequenceArrow::default(), text, activation: None }
    }

    pub fn with_arrow(mut self, arrow: SequenceArrow) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_activation(mut self, activation: Option<Activation>) -> Self {
        self.activation = activation;
        self
    }

    pub fn from(&self) -> &MessageEnd {
        &self.from
    }

    pub fn to(&self) -> &MessageEnd {
        &self.to
    }

    pub fn arrow(&self) -> &SequenceArrow {
        &self.arrow
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn activation(&self) -> Option<Activation> {
        self.activation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePlacement {
    LeftOf(Alias),
    RightOf(Alias),
    Over(ParticipantList),
    Across,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteShape {
    #[default]
    Note,
    Hexagon,
    Rectangle,
}

impl NoteShape {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Hexagon => "hnote",
            Self::Rectangle => "rnote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNote {
    placement: NotePlacement,
    shape: NoteShape,
    text: String,
    color: Option<Color>,
}

impl SequenceNote {
    pub fn new(placement: NotePlacement, text: impl Into<String>) -> Self {
        Self { placement, shape: NoteShape::Note, text: text.into(), color: None }
    }

    pub fn with_shape(mut self, shape: NoteShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn placement(&self) -> &NotePlacement {
        &self.placement
    }

    pub fn shape(&self) -> NoteShape {
        self.shape
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// `ref over A, B : text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRef {
    over: ParticipantList,
    text: String,
}

impl SequenceRef {
    pub fn new(over: ParticipantList, text: impl Into<String>) -> Self {
        Self { over, text: text.into() }
    }

    pub fn over(&self) -> &[Alias] {
        &self.over
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceBlockKind {
    Alt,
    Opt,
    Loop,
    Par,
    Break,
    Critical,
    Group,
}

impl SequenceBlockKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Loop => "loop",
            Self::Par => "par",
            Self::Break => "break",
            Self::Critical => "critical",
            Self::Group => "group",
        }
    }

    /// Whether `else` may split this block into further sections.
    pub fn allows_else(self) -> bool {
        matches!(self, Self::Alt | Self::Par | Self::Critical | Self::Group)
    }
}

/// One section of a block; the first section carries the block header, the rest are `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSection {
    label: Option<String>,
    children: Vec<SequenceNode>,
}

impl SequenceSection {
    pub fn new(label: Option<String>, children: Vec<SequenceNode>) -> Self {
        Self { label, children }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn children(&self) -> &[SequenceNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBlock {
    kind: SequenceBlockKind,
    sections: Vec<SequenceSection>,
}

impl SequenceBlock {
    pub fn new(kind: SequenceBlockKind, sections: Vec<SequenceSection>) -> Self {
        Self { kind, sections }
    }

    pub fn kind(&self) -> SequenceBlockKind {
        self.kind
    }

    pub fn sections(&self) -> &[SequenceSection] {
        &self.sections
    }
}

/// `box "title" #color … end box` around a run of participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantBox {
    title: Option<String>,
    color: Option<Color>,
    participants: Vec<SequenceParticipant>,
}

impl ParticipantBox {
    pub fn new(
        title: Option<String>,
        color: Option<Color>,
        participants: Vec<SequenceParticipant>,
    ) -> Self {
        Self { title, color, participants }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn participants(&self) -> &[SequenceParticipant] {
        &self.participants
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Autonumber {
    Start { start: Option<u32>, step: Option<u32>, format: Option<String> },
    Stop,
    Resume,
}
