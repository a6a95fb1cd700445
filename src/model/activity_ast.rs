// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::Alias;
use super::style::{Color, LinkStyle};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityAst {
    nodes: Vec<ActivityNode>,
}

impl ActivityAst {
    pub fn new(nodes: Vec<ActivityNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ActivityNode] {
        &self.nodes
    }
}

/// One element of an activity (process) diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityNode {
    Start,
    Stop,
    End,
    Kill,
    Detach,
    Break,
    Action(Action),
    Decision(Decision),
    Switch(Switch),
    While(WhileLoop),
    Repeat(RepeatLoop),
    Parallel(Parallel),
    Partition(Partition),
    Group(Group),
    Swimlane(Swimlane),
    Connector(String),
    Label(Alias),
    Goto(Alias),
    Note(ActivityNote),
    Arrow(Arrow),
}

impl ActivityNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::End => "end",
            Self::Kill => "kill",
            Self::Detach => "detach",
            Self::Break => "break",
            Self::Action(_) => "action",
            Self::Decision(_) => "if",
            Self::Switch(_) => "switch",
            Self::While(_) => "while",
            Self::Repeat(_) => "repeat",
            Self::Parallel(parallel) => match parallel.kind() {
                ParallelKind::Fork { .. } => "fork",
                ParallelKind::Split => "split",
            },
            Self::Partition(_) => "partition",
            Self::Group(_) => "group",
            Self::Swimlane(_) => "swimlane",
            Self::Connector(_) => "connector",
            Self::Label(_) => "label",
            Self::Goto(_) => "goto",
            Self::Note(_) => "note",
            Self::Arrow(_) => "arrow",
        }
    }
}

/// Terminator that selects the SDL shape of an action box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionShape {
    #[default]
    Plain,
    Task,
    Receive,
    Send,
    Slant,
    Document,
    Brace,
}

impl ActionShape {
    pub fn terminator(self) -> char {
        match self {
            Self::Plain => ';',
            Self::Task => '|',
            Self::Receive => '<',
            Self::Send => '>',
            Self::Slant => '/',
            Self::Document => ']',
            Self::Brace => '}',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    text: String,
    color: Option<Color>,
    shape: ActionShape,
}

impl Action {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: None, shape: ActionShape::Plain }
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_shape(mut self, shape: ActionShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn shape(&self) -> ActionShape {
        self.shape
    }
}

/// A conditional branch (`then` or `elseif`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    condition: String,
    label: Option<String>,
    children: Vec<ActivityNode>,
}

impl Branch {
    pub fn new(
        condition: impl Into<String>,
        label: Option<String>,
        children: Vec<ActivityNode>,
    ) -> Self {
        Self { condition: condition.into(), label, children }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseBranch {
    label: Option<String>,
    children: Vec<ActivityNode>,
}

impl ElseBranch {
    pub fn new(label: Option<String>, children: Vec<ActivityNode>) -> Self {
        Self { label, children }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

/// `if … elseif … else … endif`. The shape makes a second or non-trailing `else`
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    then: Branch,
    elseifs: Vec<Branch>,
    otherwise: Option<ElseBranch>,
}

impl Decision {
    pub fn new(then: Branch, elseifs: Vec<Branch>, otherwise: Option<ElseBranch>) -> Self {
        Self { then, elseifs, otherwise }
    }

    pub fn then(&self) -> &Branch {
        &self.then
    }

    pub fn elseifs(&self) -> &[Branch] {
        &self.elseifs
    }

    pub fn otherwise(&self) -> Option<&ElseBranch> {
        self.otherwise.as_ref()
    }

    /// Number of branches including `then` and `else`.
    pub fn branch_count(&self) -> usize {
        1 + self.elseifs.len() + usize::from(self.otherwise.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    label: String,
    children: Vec<ActivityNode>,
}

impl Case {
    pub fn new(label: impl Into<String>, children: Vec<ActivityNode>) -> Self {
        Self { label: label.into(), children }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

/// `switch … case … endswitch`; duplicate case labels are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    test: String,
    cases: Vec<Case>,
}

impl Switch {
    pub fn new(test: impl Into<String>, cases: Vec<Case>) -> Self {
        Self { test: test.into(), cases }
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileLoop {
    condition: String,
    is_label: Option<String>,
    exit_label: Option<String>,
    children: Vec<ActivityNode>,
}

impl WhileLoop {
    pub fn new(
        condition: impl Into<String>,
        is_label: Option<String>,
        exit_label: Option<String>,
        children: Vec<ActivityNode>,
    ) -> Self {
        Self { condition: condition.into(), is_label, exit_label, children }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn is_label(&self) -> Option<&str> {
        self.is_label.as_deref()
    }

    pub fn exit_label(&self) -> Option<&str> {
        self.exit_label.as_deref()
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatLoop {
    start: Option<String>,
    children: Vec<ActivityNode>,
    backward: Option<String>,
    condition: String,
    is_label: Option<String>,
    not_label: Option<String>,
}

impl RepeatLoop {
    pub fn new(condition: impl Into<String>, children: Vec<ActivityNode>) -> Self {
        Self {
            start: None,
            children,
            backward: None,
            condition: condition.into(),
            is_label: None,
            not_label: None,
        }
    }

    pub fn with_start(mut self, start: Option<String>) -> Self {
        self.start = start;
        self
    }

    pub fn with_backward(mut self, backward: Option<String>) -> Self {
        self.backward = backward;
        self
    }

    pub fn with_labels(mut self, is_label: Option<String>, not_label: Option<String>) -> Self {
        self.is_label = is_label;
        self.not_label = not_label;
        self
    }

    /// Action written on the `repeat` line itself.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }

    pub fn backward(&self) -> Option<&str> {
        self.backward.as_deref()
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn is_label(&self) -> Option<&str> {
        self.is_label.as_deref()
    }

    pub fn not_label(&self) -> Option<&str> {
        self.not_label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ForkEnd {
    #[default]
    Fork,
    Merge,
    Join(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParallelKind {
    Fork { end: ForkEnd },
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelBranch {
    children: Vec<ActivityNode>,
}

impl ParallelBranch {
    pub fn new(children: Vec<ActivityNode>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

/// `fork … fork again … end fork` or `split … split again … end split`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parallel {
    kind: ParallelKind,
    branches: Vec<ParallelBranch>,
}

impl Parallel {
    pub fn new(kind: ParallelKind, branches: Vec<ParallelBranch>) -> Self {
        Self { kind, branches }
    }

    pub fn kind(&self) -> &ParallelKind {
        &self.kind
    }

    pub fn branches(&self) -> &[ParallelBranch] {
        &self.branches
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    name: String,
    color: Option<Color>,
    children: Vec<ActivityNode>,
}

impl Partition {
    pub fn new(name: impl Into<String>, color: Option<Color>, children: Vec<ActivityNode>) -> Self {
        Self { name: name.into(), color, children }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    children: Vec<ActivityNode>,
}

impl Group {
    pub fn new(name: impl Into<String>, children: Vec<ActivityNode>) -> Self {
        Self { name: name.into(), children }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ActivityNode] {
        &self.children
    }
}

/// Switches subsequent nodes to a swimlane: `|#color|name| label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swimlane {
    name: String,
    color: Option<Color>,
    label: Option<String>,
}

impl Swimlane {
    pub fn new(name: impl Into<String>, color: Option<Color>, label: Option<String>) -> Self {
        Self { name: name.into(), color, label }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityNote {
    side: NoteSide,
    text: String,
    floating: bool,
    color: Option<Color>,
}

impl ActivityNote {
    pub fn new(side: NoteSide, text: impl Into<String>) -> Self {
        Self { side, text: text.into(), floating: false, color: None }
    }

    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn side(&self) -> NoteSide {
        self.side
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn floating(&self) -> bool {
        self.floating
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// Styled and/or labeled arrow leading to the next node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arrow {
    label: Option<String>,
    style: LinkStyle,
}

impl Arrow {
    pub fn new(label: Option<String>, style: LinkStyle) -> Self {
        Self { label, style }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &LinkStyle {
        &self.style
    }
}
