// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! State diagram front-end.

use std::ops::{Deref, DerefMut};

use super::{optional_text, DiagramBuilder, Engine, Grammar, ScopeFrame};
use crate::error::{BuildError, StructuralError, ValidationError};
use crate::model::diagram::{non_empty, single_line};
use crate::model::ids::is_bare_name;
use crate::model::{
    Alias, Color, CompositeState, DiagramAst, DiagramKind, Direction, LineStyle, LinkStyle,
    Region, RegionSeparator, Side, State, StateAst, StateEndpoint, StateKind,
    StateNode, StateNote, Transition,
};

const STATE: &str = "state";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateGrammar;

impl Grammar for StateGrammar {
    type Node = StateNode;
    type Scope = StateScope;
    type Context = ();

    const KIND: DiagramKind = DiagramKind::State;

    fn node_kind(node: &StateNode) -> &'static str {
        node.kind_name()
    }

    fn into_ast(nodes: Vec<StateNode>) -> DiagramAst {
        DiagramAst::State(StateAst::new(nodes))
    }
}

pub type StateDiagram = DiagramBuilder<StateGrammar>;

impl DiagramBuilder<StateGrammar> {
    pub fn body(&mut self) -> StateBody<'_> {
        StateBody { engine: self.engine_mut() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSpec {
    pub name: String,
    pub alias: Option<String>,
    pub kind: StateKind,
    /// Lines written as `alias : line` under the state.
    pub description: Vec<String>,
    pub color: Option<Color>,
}

impl StateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn describe(mut self, line: impl Into<String>) -> Self {
        self.description.push(line.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for StateSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Transition endpoint: `[*]`, `[H]`, `[H*]` or the alias of a declared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateRef {
    Terminal,
    History,
    DeepHistory,
    State(String),
}

impl From<&str> for StateRef {
    fn from(value: &str) -> Self {
        match value {
            "[*]" => Self::Terminal,
            "[H]" => Self::History,
            "[H*]" => Self::DeepHistory,
            alias => Self::State(alias.to_owned()),
        }
    }
}

impl From<&Alias> for StateRef {
    fn from(alias: &Alias) -> Self {
        Self::State(alias.as_str().to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionSpec {
    pub label: Option<String>,
    pub direction: Option<Direction>,
    pub color: Option<Color>,
    pub line: Option<LineStyle>,
}

impl TransitionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }
}

impl From<&str> for TransitionSpec {
    fn from(label: &str) -> Self {
        Self::new().with_label(label)
    }
}

/// An open composite state.
#[derive(Debug)]
pub struct StateScope {
    state: State,
    separator: Option<RegionSeparator>,
    regions: Vec<Vec<StateNode>>,
}

impl StateScope {
    pub fn composite(state: State) -> Self {
        Self { state, separator: None, regions: vec![Vec::new()] }
    }

    fn start_region(&mut self, separator: RegionSeparator, call: usize) -> Result<(), BuildError> {
        if self.regions.last().map_or(true, Vec::is_empty) {
            return Err(StructuralError::Misplaced {
                what: "region",
                scope: STATE,
                expected: "content in the current region first",
                call,
            }
            .into());
        }
        if self.separator.is_some_and(|current| current != separator) {
            return Err(ValidationError::IneffectiveOption {
                option: "region separator",
                target: "composite state",
                reason: "all regions of one state share the first separator",
            }
            .into());
        }
        self.separator = Some(separator);
        self.regions.push(Vec::new());
        Ok(())
    }
}

impl ScopeFrame for StateScope {
    type Node = StateNode;

    fn kind(&self) -> &'static str {
        STATE
    }

    fn push(&mut self, node: StateNode, _call: usize) -> Result<(), StructuralError> {
        match self.regions.last_mut() {
            Some(region) => region.push(node),
            None => self.regions.push(vec![node]),
        }
        Ok(())
    }

    fn into_node(self, _call: usize) -> Result<StateNode, StructuralError> {
        let regions = self.regions.into_iter().map(Region::new).collect();
        Ok(StateNode::Composite(CompositeState::new(
            self.state,
            self.separator.unwrap_or_default(),
            regions,
        )))
    }
}

fn declare_state(
    engine: &mut Engine<StateGrammar>,
    spec: StateSpec,
    call: usize,
) -> Result<State, BuildError> {
    let name = single_line(spec.name, "state name")?;
    let description = spec
        .description
        .into_iter()
        .map(|line| single_line(line, "state description"))
        .collect::<Result<Vec<_>, _>>()?;
    let (alias, display) = match spec.alias {
        Some(alias) => {
            let alias = Alias::new(alias)?;
            let display = (name != alias.as_str()).then_some(name);
            (alias, display)
        }
        None if is_bare_name(&name) => (Alias::new(&name)?, None),
        None => (engine.registry_mut().generate("s"), Some(name)),
    };
    engine.registry_mut().declare(alias.clone(), STATE, call)?;
    Ok(State::new(alias)
        .with_display(display)
        .with_kind(spec.kind)
        .with_description(description)
        .with_color(spec.color))
}

fn resolve(
    engine: &Engine<StateGrammar>,
    end: StateRef,
    call: usize,
) -> Result<StateEndpoint, BuildError> {
    Ok(match end {
        StateRef::Terminal => StateEndpoint::Terminal,
        StateRef::History => StateEndpoint::History,
        StateRef::DeepHistory => StateEndpoint::DeepHistory,
        StateRef::State(alias) => {
            StateEndpoint::State(engine.aliases().require(&alias, STATE, call)?)
        }
    })
}

pub struct StateBody<'a> {
    engine: &'a mut Engine<StateGrammar>,
}

impl StateBody<'_> {
    /// Declares a state; names that are not bare identifiers get a generated alias.
    pub fn state(&mut self, spec: impl Into<StateSpec>) -> Result<Alias, BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let state = declare_state(engine, spec, call)?;
            let alias = state.alias().clone();
            engine.append(StateNode::State(state), call)?;
            Ok(alias)
        })
    }

    /// Declares a state with nested states, transitions and concurrent regions.
    pub fn composite(
        &mut self,
        spec: impl Into<StateSpec>,
        body: impl FnOnce(&mut CompositeBody<'_>) -> Result<(), BuildError>,
    ) -> Result<Alias, BuildError> {
        let spec = spec.into();
        let (alias, ()) = self.engine.scoped_with(
            |engine, call| {
                if spec.kind != StateKind::Normal {
                    return Err(ValidationError::IneffectiveOption {
                        option: "pseudo-state kind",
                        target: "composite state",
                        reason: "only plain states can hold nested states",
                    }
                    .into());
                }
                let state = declare_state(engine, spec, call)?;
                let alias = state.alias().clone();
                Ok((StateScope::composite(state), alias))
            },
            |engine| body(&mut CompositeBody { body: StateBody { engine } }),
        )?;
        Ok(alias)
    }

    pub fn transition(
        &mut self,
        from: impl Into<StateRef>,
        to: impl Into<StateRef>,
        spec: impl Into<TransitionSpec>,
    ) -> Result<(), BuildError> {
        let (from, to, spec) = (from.into(), to.into(), spec.into());
        self.engine.step(|engine, call| {
            let from = resolve(engine, from, call)?;
            let to = resolve(engine, to, call)?;
            let label = optional_text(spec.label, "transition label")?;
            let mut style = LinkStyle::new();
            if let Some(color) = spec.color {
                style = style.with_color(color);
            }
            if let Some(line) = spec.line {
                style = style.with_line(line);
            }
            let transition = Transition::new(from, to)
                .with_label(label)
                .with_direction(spec.direction)
                .with_style(style);
            engine.append(StateNode::Transition(transition), call)
        })
    }

    pub fn note(
        &mut self,
        side: Side,
        target: &str,
        text: impl Into<String>,
        color: Option<Color>,
    ) -> Result<(), BuildError> {
        let text = text.into();
        self.engine.step(|engine, call| {
            let target = engine.aliases().require(target, STATE, call)?;
            let text = non_empty(text, "note text")?;
            let note = StateNote::new(side, target, text).with_color(color);
            engine.append(StateNode::Note(note), call)
        })
    }
}

/// Body of a composite state.
pub struct CompositeBody<'a> {
    body: StateBody<'a>,
}

impl CompositeBody<'_> {
    /// Starts the next concurrent region, separated by `--` or `||`.
    pub fn region(&mut self, separator: RegionSeparator) -> Result<(), BuildError> {
        self.body.engine.step(|engine, call| match engine.innermost_mut() {
            Some(scope) => scope.start_region(separator, call),
            None => Err(StructuralError::Misplaced {
                what: "region",
                scope: super::ROOT_KIND,
                expected: "a composite state",
                call,
            }
            .into()),
        })
    }
}

impl<'a> Deref for CompositeBody<'a> {
    type Target = StateBody<'a>;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl DerefMut for CompositeBody<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.body
    }
}
