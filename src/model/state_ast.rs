// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::Alias;
use super::style::{Color, Direction, LinkStyle, Side};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateAst {
    nodes: Vec<StateNode>,
}

impl StateAst {
    pub fn new(nodes: Vec<StateNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateNode {
    State(State),
    Composite(CompositeState),
    Transition(Transition),
    Note(StateNote),
}

impl StateNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::Composite(_) => "composite state",
            Self::Transition(_) => "transition",
            Self::Note(_) => "note",
        }
    }
}

/// Pseudo-state stereotypes; `Normal` writes none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateKind {
    #[default]
    Normal,
    Choice,
    Fork,
    Join,
    End,
    History,
    DeepHistory,
    EntryPoint,
    ExitPoint,
    InputPin,
    OutputPin,
}

impl StateKind {
    pub fn stereotype(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Choice => Some("choice"),
            Self::Fork => Some("fork"),
            Self::Join => Some("join"),
            Self::End => Some("end"),
            Self::History => Some("history"),
            Self::DeepHistory => Some("history*"),
            Self::EntryPoint => Some("entryPoint"),
            Self::ExitPoint => Some("exitPoint"),
            Self::InputPin => Some("inputPin"),
            Self::OutputPin => Some("outputPin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    alias: Alias,
    display: Option<String>,
    kind: StateKind,
    description: Vec<String>,
    color: Option<Color>,
}

impl State {
    pub fn new(alias: Alias) -> Self {
        Self { alias, display: None, kind: StateKind::Normal, description: Vec::new(), color: None }
    }

    pub fn with_display(mut self, display: Option<String>) -> Self {
        self.display = display;
        self
    }

    pub fn with_kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: Vec<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Description lines, each written as `alias : line`.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// Separator between concurrent regions of a composite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionSeparator {
    #[default]
    Horizontal,
    Vertical,
}

impl RegionSeparator {
    pub fn token(self) -> &'static str {
        match self {
            Self::Horizontal => "--",
            Self::Vertical => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    children: Vec<StateNode>,
}

impl Region {
    pub fn new(children: Vec<StateNode>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[StateNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeState {
    state: State,
    separator: RegionSeparator,
    regions: Vec<Region>,
}

impl CompositeState {
    pub fn new(state: State, separator: RegionSeparator, regions: Vec<Region>) -> Self {
        Self { state, separator, regions }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn separator(&self) -> RegionSeparator {
        self.separator
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEndpoint {
    /// `[*]`: initial state as a source, final state as a target.
    Terminal,
    History,
    DeepHistory,
    State(Alias),
}

impl StateEndpoint {
    pub fn state(&self) -> Option<&Alias> {
        match self {
            Self::State(alias) => Some(alias),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    from: StateEndpoint,
    to: StateEndpoint,
    label: Option<String>,
    direction: Option<Direction>,
    style: LinkStyle,
}

impl Transition {
    pub fn new(from: StateEndpoint, to: StateEndpoint) -> Self {
        Self { from, to, label: None, direction: None, style: LinkStyle::default() }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    pub fn from(&self) -> &StateEndpoint {
        &self.from
    }

    pub fn to(&self) -> &StateEndpoint {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn style(&self) -> &LinkStyle {
        &self.style
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateNote {
    side: Side,
    target: Alias,
    text: String,
    color: Option<Color>,
}

impl StateNote {
    pub fn new(side: Side, target: Alias, text: impl Into<String>) -> Self {
        Self { side, target, text: text.into(), color: None }
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn target(&self) -> &Alias {
        &self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}
