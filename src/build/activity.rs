// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Activity diagram front-end.
//!
//! ```
//! use plantscribe::build::ActivityDiagram;
//! use plantscribe::format::plantuml::export_diagram;
//! use plantscribe::RenderOptions;
//!
//! let mut diagram = ActivityDiagram::new();
//! let mut body = diagram.body();
//! body.start()?;
//! body.while_("more input?", |lp| {
//!     lp.action("read chunk")?;
//!     lp.if_("corrupt?", |decision| decision.break_())
//! })?;
//! body.stop()?;
//!
//! let text = export_diagram(&diagram.finish()?, &RenderOptions::default())?;
//! assert!(text.contains("while (more input?)"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::ops::{Deref, DerefMut};

use super::{optional_text, DiagramBuilder, Engine, Grammar, ScopeFrame, ROOT_KIND};
use crate::error::{BuildError, StructuralError, ValidationError};
use crate::model::diagram::{non_empty, single_line};
use crate::model::{
    Action, ActionShape, ActivityAst, ActivityNode, ActivityNote, Alias, Arrow, Branch, Case,
    Color, Decision, DiagramAst, DiagramKind, ElseBranch, ForkEnd, Group, LineStyle, LinkStyle,
    NoteSide, Parallel, ParallelBranch, ParallelKind, Partition, RepeatLoop, Swimlane, Switch,
    WhileLoop,
};

const LABEL: &str = "label";

/// Activity grammar marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityGrammar;

impl Grammar for ActivityGrammar {
    type Node = ActivityNode;
    type Scope = ActivityScope;
    type Context = Lanes;

    const KIND: DiagramKind = DiagramKind::Activity;

    fn node_kind(node: &ActivityNode) -> &'static str {
        node.kind_name()
    }

    fn into_ast(nodes: Vec<ActivityNode>) -> DiagramAst {
        DiagramAst::Activity(ActivityAst::new(nodes))
    }
}

/// Swimlanes declared so far, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Lanes {
    names: Vec<String>,
}

impl Lanes {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|lane| lane == name)
    }
}

pub type ActivityDiagram = DiagramBuilder<ActivityGrammar>;

impl DiagramBuilder<ActivityGrammar> {
    /// Handle for authoring at the diagram root.
    pub fn body(&mut self) -> ActivityBody<'_> {
        ActivityBody { engine: self.engine_mut() }
    }

    pub fn lanes(&self) -> &Lanes {
        self.engine().context()
    }
}

// ---------------------------------------------------------------------------
// Call parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSpec {
    pub text: String,
    pub color: Option<Color>,
    pub shape: ActionShape,
}

impl ActionSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_shape(mut self, shape: ActionShape) -> Self {
        self.shape = shape;
        self
    }
}

impl From<&str> for ActionSpec {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ActionSpec {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Condition and optional branch label of an `if` or `elseif`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfSpec {
    pub condition: String,
    pub label: Option<String>,
}

impl IfSpec {
    pub fn new(condition: impl Into<String>) -> Self {
        Self { condition: condition.into(), label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&str> for IfSpec {
    fn from(condition: &str) -> Self {
        Self::new(condition)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhileSpec {
    pub condition: String,
    /// Label on the looping edge (`is (label)`).
    pub is_label: Option<String>,
    /// Label on the exit edge (`endwhile (label)`).
    pub exit_label: Option<String>,
}

impl WhileSpec {
    pub fn new(condition: impl Into<String>) -> Self {
        Self { condition: condition.into(), ..Self::default() }
    }

    pub fn with_labels(
        mut self,
        is_label: impl Into<String>,
        exit_label: impl Into<String>,
    ) -> Self {
        self.is_label = Some(is_label.into());
        self.exit_label = Some(exit_label.into());
        self
    }
}

impl From<&str> for WhileSpec {
    fn from(condition: &str) -> Self {
        Self::new(condition)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatSpec {
    /// Condition written after `repeat while`.
    pub condition: String,
    /// Action shown on the `repeat` line itself.
    pub start: Option<String>,
    pub is_label: Option<String>,
    pub not_label: Option<String>,
}

impl RepeatSpec {
    pub fn new(condition: impl Into<String>) -> Self {
        Self { condition: condition.into(), ..Self::default() }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_labels(
        mut self,
        is_label: impl Into<String>,
        not_label: impl Into<String>,
    ) -> Self {
        self.is_label = Some(is_label.into());
        self.not_label = Some(not_label.into());
        self
    }
}

impl From<&str> for RepeatSpec {
    fn from(condition: &str) -> Self {
        Self::new(condition)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionSpec {
    pub name: String,
    pub color: Option<Color>,
}

impl PartitionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), color: None }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for PartitionSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Swimlane switch; color and label only apply where the lane is first used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwimlaneSpec {
    pub name: String,
    pub color: Option<Color>,
    pub label: Option<String>,
}

impl SwimlaneSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&str> for SwimlaneSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSpec {
    pub side: NoteSide,
    pub text: String,
    pub floating: bool,
}

impl NoteSpec {
    pub fn left(text: impl Into<String>) -> Self {
        Self { side: NoteSide::Left, text: text.into(), floating: false }
    }

    pub fn right(text: impl Into<String>) -> Self {
        Self { side: NoteSide::Right, text: text.into(), floating: false }
    }

    pub fn floating(mut self) -> Self {
        self.floating = true;
        self
    }
}

impl From<&str> for NoteSpec {
    fn from(text: &str) -> Self {
        Self::right(text)
    }
}

/// Label and styling of the next arrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrowSpec {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub line: Option<LineStyle>,
}

impl ArrowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
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

impl From<&str> for ArrowSpec {
    fn from(label: &str) -> Self {
        Self::new().with_label(label)
    }
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// An open activity construct.
///
/// Construct these with the associated functions; the payload types are opaque.
#[derive(Debug)]
pub enum ActivityScope {
    Decision(DecisionScope),
    Switch(SwitchScope),
    While(WhileScope),
    Repeat(RepeatScope),
    Parallel(ParallelScope),
    Branch(BranchScope),
    Partition(PartitionScope),
    Group(GroupScope),
}

#[derive(Debug)]
struct BranchDraft {
    condition: String,
    label: Option<String>,
    children: Vec<ActivityNode>,
}

#[derive(Debug)]
pub struct DecisionScope {
    then: BranchDraft,
    elseifs: Vec<BranchDraft>,
    otherwise: Option<(Option<String>, Vec<ActivityNode>)>,
}

impl DecisionScope {
    fn active(&mut self) -> &mut Vec<ActivityNode> {
        match (&mut self.otherwise, self.elseifs.last_mut()) {
            (Some((_, children)), _) => children,
            (None, Some(branch)) => &mut branch.children,
            (None, None) => &mut self.then.children,
        }
    }

    fn open_elseif(
        &mut self,
        condition: String,
        label: Option<String>,
        call: usize,
    ) -> Result<(), StructuralError> {
        if self.otherwise.is_some() {
            return Err(StructuralError::BranchAfterElse { call });
        }
        self.elseifs.push(BranchDraft { condition, label, children: Vec::new() });
        Ok(())
    }

    fn open_else(&mut self, label: Option<String>, call: usize) -> Result<(), StructuralError> {
        if self.otherwise.is_some() {
            return Err(StructuralError::DuplicateElse { call });
        }
        self.otherwise = Some((label, Vec::new()));
        Ok(())
    }
}

#[derive(Debug)]
pub struct SwitchScope {
    test: String,
    cases: Vec<(String, Vec<ActivityNode>)>,
}

#[derive(Debug)]
pub struct WhileScope {
    condition: String,
    is_label: Option<String>,
    exit_label: Option<String>,
    children: Vec<ActivityNode>,
}

#[derive(Debug)]
pub struct RepeatScope {
    spec: RepeatSpec,
    children: Vec<ActivityNode>,
    backward: Option<String>,
}

#[derive(Debug)]
pub struct ParallelScope {
    split: bool,
    end: Option<ForkEnd>,
    branches: Vec<ParallelBranch>,
}

impl ParallelScope {
    fn kind(&self) -> &'static str {
        if self.split {
            "split"
        } else {
            "fork"
        }
    }

    fn set_end(&mut self, end: ForkEnd, call: usize) -> Result<(), BuildError> {
        if self.split {
            return Err(ValidationError::IneffectiveOption {
                option: "end style",
                target: "split",
                reason: "a split always closes with 'end split'",
            }
            .into());
        }
        if self.end.is_some() {
            return Err(StructuralError::DuplicateClause {
                clause: "end style",
                scope: "fork",
                call,
            }
            .into());
        }
        self.end = Some(end);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct BranchScope {
    children: Vec<ActivityNode>,
}

#[derive(Debug)]
pub struct PartitionScope {
    name: String,
    color: Option<Color>,
    children: Vec<ActivityNode>,
}

#[derive(Debug)]
pub struct GroupScope {
    name: String,
    children: Vec<ActivityNode>,
}

impl ActivityScope {
    pub fn decision(spec: impl Into<IfSpec>) -> Result<Self, ValidationError> {
        let spec = spec.into();
        Ok(Self::Decision(DecisionScope {
            then: BranchDraft {
                condition: non_empty(spec.condition, "condition")?,
                label: optional_text(spec.label, "branch label")?,
                children: Vec::new(),
            },
            elseifs: Vec::new(),
            otherwise: None,
        }))
    }

    pub fn switch(test: impl Into<String>) -> Result<Self, ValidationError> {
        let test = non_empty(test.into(), "switch test")?;
        Ok(Self::Switch(SwitchScope { test, cases: Vec::new() }))
    }

    pub fn while_(spec: impl Into<WhileSpec>) -> Result<Self, ValidationError> {
        let spec = spec.into();
        Ok(Self::While(WhileScope {
            condition: non_empty(spec.condition, "condition")?,
            is_label: optional_text(spec.is_label, "loop label")?,
            exit_label: optional_text(spec.exit_label, "loop label")?,
            children: Vec::new(),
        }))
    }

    pub fn repeat(spec: impl Into<RepeatSpec>) -> Result<Self, ValidationError> {
        let spec = spec.into();
        let spec = RepeatSpec {
            condition: non_empty(spec.condition, "condition")?,
            start: optional_text(spec.start, "repeat start action")?,
            is_label: optional_text(spec.is_label, "loop label")?,
            not_label: optional_text(spec.not_label, "loop label")?,
        };
        Ok(Self::Repeat(RepeatScope { spec, children: Vec::new(), backward: None }))
    }

    pub fn fork() -> Self {
        Self::Parallel(ParallelScope { split: false, end: None, branches: Vec::new() })
    }

    pub fn split() -> Self {
        Self::Parallel(ParallelScope { split: true, end: None, branches: Vec::new() })
    }

    /// One branch of a fork or split; only valid directly inside one.
    pub fn branch() -> Self {
        Self::Branch(BranchScope::default())
    }

    pub fn partition(spec: impl Into<PartitionSpec>) -> Result<Self, ValidationError> {
        let spec = spec.into();
        Ok(Self::Partition(PartitionScope {
            name: single_line(spec.name, "partition name")?,
            color: spec.color,
            children: Vec::new(),
        }))
    }

    pub fn group(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = single_line(name.into(), "group name")?;
        Ok(Self::Group(GroupScope { name, children: Vec::new() }))
    }
}

fn misplaced(
    what: &'static str,
    scope: &'static str,
    expected: &'static str,
    call: usize,
) -> StructuralError {
    StructuralError::Misplaced { what, scope, expected, call }
}

impl ScopeFrame for ActivityScope {
    type Node = ActivityNode;

    fn kind(&self) -> &'static str {
        match self {
            Self::Decision(_) => "if",
            Self::Switch(_) => "switch",
            Self::While(_) => "while",
            Self::Repeat(_) => "repeat",
            Self::Parallel(parallel) => parallel.kind(),
            Self::Branch(_) => "branch",
            Self::Partition(_) => "partition",
            Self::Group(_) => "group",
        }
    }

    fn is_loop(&self) -> bool {
        matches!(self, Self::While(_) | Self::Repeat(_))
    }

    fn fits_root(&self) -> Result<(), &'static str> {
        match self {
            Self::Branch(_) => Err("a 'fork' or 'split' around each 'branch'"),
            _ => Ok(()),
        }
    }

    fn admits(&self, child: &Self) -> Result<(), &'static str> {
        match (self, child) {
            (Self::Parallel(_), Self::Branch(_)) => Ok(()),
            (Self::Parallel(_), _) => Err("a 'branch'"),
            (_, Self::Branch(_)) => Err("a 'fork' or 'split' around each 'branch'"),
            (Self::Switch(switch), _) if switch.cases.is_empty() => Err("a 'case' first"),
            (Self::Repeat(repeat), _) if repeat.backward.is_some() => {
                Err("nothing after 'backward'")
            }
            _ => Ok(()),
        }
    }

    fn push(&mut self, node: ActivityNode, call: usize) -> Result<(), StructuralError> {
        let what = node.kind_name();
        match self {
            Self::Decision(decision) => decision.active().push(node),
            Self::Switch(switch) => match switch.cases.last_mut() {
                Some((_, children)) => children.push(node),
                None => return Err(misplaced(what, "switch", "a 'case' first", call)),
            },
            Self::While(scope) => scope.children.push(node),
            Self::Repeat(repeat) => {
                if repeat.backward.is_some() {
                    return Err(misplaced(what, "repeat", "nothing after 'backward'", call));
                }
                repeat.children.push(node);
            }
            Self::Parallel(parallel) => {
                return Err(misplaced(what, parallel.kind(), "a 'branch'", call));
            }
            Self::Branch(branch) => branch.children.push(node),
            Self::Partition(partition) => partition.children.push(node),
            Self::Group(group) => group.children.push(node),
        }
        Ok(())
    }

    fn adopt(&mut self, child: Self, call: usize) -> Result<(), StructuralError> {
        match (self, child) {
            (Self::Parallel(parallel), Self::Branch(branch)) => {
                parallel.branches.push(ParallelBranch::new(branch.children));
                Ok(())
            }
            (Self::Parallel(parallel), child) => {
                Err(misplaced(child.kind(), parallel.kind(), "a 'branch'", call))
            }
            (parent, Self::Branch(_)) => Err(misplaced(
                "branch",
                parent.kind(),
                "a 'fork' or 'split' around each 'branch'",
                call,
            )),
            (parent, child) => parent.push(child.into_node(call)?, call),
        }
    }

    fn into_node(self, call: usize) -> Result<ActivityNode, StructuralError> {
        Ok(match self {
            Self::Decision(decision) => {
                let then = decision.then;
                let elseifs = decision
                    .elseifs
                    .into_iter()
                    .map(|branch| Branch::new(branch.condition, branch.label, branch.children))
                    .collect();
                let otherwise =
                    decision.otherwise.map(|(label, children)| ElseBranch::new(label, children));
                ActivityNode::Decision(Decision::new(
                    Branch::new(then.condition, then.label, then.children),
                    elseifs,
                    otherwise,
                ))
            }
            Self::Switch(switch) => {
                let cases =
                    switch.cases.into_iter().map(|(label, children)| Case::new(label, children));
                ActivityNode::Switch(Switch::new(switch.test, cases.collect()))
            }
            Self::While(scope) => ActivityNode::While(WhileLoop::new(
                scope.condition,
                scope.is_label,
                scope.exit_label,
                scope.children,
            )),
            Self::Repeat(repeat) => {
                let spec = repeat.spec;
                ActivityNode::Repeat(
                    RepeatLoop::new(spec.condition, repeat.children)
                        .with_start(spec.start)
                        .with_backward(repeat.backward)
                        .with_labels(spec.is_label, spec.not_label),
                )
            }
            Self::Parallel(parallel) => {
                let kind = if parallel.split {
                    ParallelKind::Split
                } else {
                    ParallelKind::Fork { end: parallel.end.unwrap_or_default() }
                };
                ActivityNode::Parallel(Parallel::new(kind, parallel.branches))
            }
            Self::Branch(_) => {
                return Err(misplaced(
                    "branch",
                    ROOT_KIND,
                    "a 'fork' or 'split' around each 'branch'",
                    call,
                ));
            }
            Self::Partition(partition) => ActivityNode::Partition(Partition::new(
                partition.name,
                partition.color,
                partition.children,
            )),
            Self::Group(group) => ActivityNode::Group(Group::new(group.name, group.children)),
        })
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Authoring handle valid at the root and inside every sequential scope.
pub struct ActivityBody<'a> {
    engine: &'a mut Engine<ActivityGrammar>,
}

impl<'a> ActivityBody<'a> {
    fn leaf(&mut self, node: ActivityNode) -> Result<(), BuildError> {
        self.engine.leaf(node)
    }

    pub fn start(&mut self) -> Result<(), BuildError> {
        self.leaf(ActivityNode::Start)
    }

    pub fn stop(&mut self) -> Result<(), BuildError> {
        self.leaf(ActivityNode::Stop)
    }

    pub fn end(&mut self) -> Result<(), BuildError> {
        self.leaf(ActivityNode::End)
    }

    pub fn kill(&mut self) -> Result<(), BuildError> {
        self.leaf(ActivityNode::Kill)
    }

    pub fn detach(&mut self) -> Result<(), BuildError> {
        self.leaf(ActivityNode::Detach)
    }

    pub fn action(&mut self, text: impl Into<String>) -> Result<(), BuildError> {
        self.action_with(ActionSpec::new(text))
    }

    pub fn action_with(&mut self, spec: impl Into<ActionSpec>) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let text = non_empty(spec.text, "action text")?;
            let action = Action::new(text).with_color(spec.color).with_shape(spec.shape);
            engine.append(ActivityNode::Action(action), call)
        })
    }

    /// Styles or labels the arrow leading to the next element.
    pub fn arrow(&mut self, spec: impl Into<ArrowSpec>) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let label = optional_text(spec.label, "arrow label")?;
            let mut style = LinkStyle::new();
            if let Some(color) = spec.color {
                style = style.with_color(color);
            }
            if let Some(line) = spec.line {
                style = style.with_line(line);
            }
            engine.append(ActivityNode::Arrow(Arrow::new(label, style)), call)
        })
    }

    pub fn note(&mut self, spec: impl Into<NoteSpec>) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let text = non_empty(spec.text, "note text")?;
            let note = ActivityNote::new(spec.side, text).with_floating(spec.floating);
            engine.append(ActivityNode::Note(note), call)
        })
    }

    /// Circular connector `(name)`.
    pub fn connector(&mut self, name: impl Into<String>) -> Result<(), BuildError> {
        let name = name.into();
        self.engine.step(|engine, call| {
            let name = single_line(name, "connector name")?;
            engine.append(ActivityNode::Connector(name), call)
        })
    }

    /// Declares a jump target for [`ActivityBody::goto`].
    pub fn label(&mut self, name: &str) -> Result<Alias, BuildError> {
        self.engine.step(|engine, call| {
            let alias = Alias::new(name)?;
            engine.registry_mut().declare(alias.clone(), LABEL, call)?;
            engine.append(ActivityNode::Label(alias.clone()), call)?;
            Ok(alias)
        })
    }

    /// Jumps to a label declared earlier in this diagram.
    pub fn goto(&mut self, name: &str) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let alias = engine.aliases().require(name, LABEL, call)?;
            engine.append(ActivityNode::Goto(alias), call)
        })
    }

    /// Leaves the nearest enclosing loop, through any number of non-loop scopes.
    pub fn break_(&mut self) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            if engine.enclosing(ActivityScope::is_loop).is_none() {
                return Err(StructuralError::BreakOutsideLoop {
                    scope: engine.innermost_kind(),
                    call,
                }
                .into());
            }
            engine.append(ActivityNode::Break, call)
        })
    }

    /// Switches the current swimlane, declaring it on first use.
    pub fn swimlane(&mut self, spec: impl Into<SwimlaneSpec>) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let name = single_line(spec.name, "swimlane name")?;
            let label = optional_text(spec.label, "swimlane label")?;
            let known = engine.context_mut().contains(&name);
            let lane = if known {
                if spec.color.is_some() {
                    return Err(lane_option_error("color"));
                }
                if label.is_some() {
                    return Err(lane_option_error("label"));
                }
                Swimlane::new(name.clone(), None, None)
            } else {
                Swimlane::new(name.clone(), spec.color, label)
            };
            engine.append(ActivityNode::Swimlane(lane), call)?;
            if !known {
                engine.context_mut().names.push(name);
            }
            Ok(())
        })
    }

    pub fn if_(
        &mut self,
        spec: impl Into<IfSpec>,
        body: impl FnOnce(&mut DecisionBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::decision(spec)?),
            |engine| body(&mut DecisionBody { body: ActivityBody { engine } }),
        )
    }

    pub fn switch(
        &mut self,
        test: impl Into<String>,
        body: impl FnOnce(&mut SwitchBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let test = test.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::switch(test)?),
            |engine| body(&mut SwitchBody { body: ActivityBody { engine } }),
        )
    }

    pub fn while_(
        &mut self,
        spec: impl Into<WhileSpec>,
        body: impl FnOnce(&mut LoopBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::while_(spec)?),
            |engine| body(&mut LoopBody { body: ActivityBody { engine } }),
        )
    }

    pub fn repeat(
        &mut self,
        spec: impl Into<RepeatSpec>,
        body: impl FnOnce(&mut LoopBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::repeat(spec)?),
            |engine| body(&mut LoopBody { body: ActivityBody { engine } }),
        )
    }

    pub fn fork(
        &mut self,
        body: impl FnOnce(&mut ParallelBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        self.engine
            .scoped(|_, _| Ok(ActivityScope::fork()), |engine| body(&mut ParallelBody { engine }))
    }

    pub fn split(
        &mut self,
        body: impl FnOnce(&mut ParallelBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        self.engine
            .scoped(|_, _| Ok(ActivityScope::split()), |engine| body(&mut ParallelBody { engine }))
    }

    pub fn partition(
        &mut self,
        spec: impl Into<PartitionSpec>,
        body: impl FnOnce(&mut ActivityBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::partition(spec)?),
            |engine| body(&mut ActivityBody { engine }),
        )
    }

    pub fn group(
        &mut self,
        name: impl Into<String>,
        body: impl FnOnce(&mut ActivityBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let name = name.into();
        self.engine.scoped(
            |_, _| Ok(ActivityScope::group(name)?),
            |engine| body(&mut ActivityBody { engine }),
        )
    }
}

fn lane_option_error(option: &'static str) -> BuildError {
    ValidationError::IneffectiveOption {
        option,
        target: "swimlane",
        reason: "lane options only apply where the lane is first used",
    }
    .into()
}

/// Body of an `if`: the `then` branch, later `elseif` branches and an optional final `else`.
pub struct DecisionBody<'a> {
    body: ActivityBody<'a>,
}

impl DecisionBody<'_> {
    pub fn elseif(&mut self, spec: impl Into<IfSpec>) -> Result<(), BuildError> {
        let spec = spec.into();
        self.body.engine.step(|engine, call| {
            let condition = non_empty(spec.condition, "condition")?;
            let label = optional_text(spec.label, "branch label")?;
            let scope = engine.innermost_kind();
            match engine.innermost_mut() {
                Some(ActivityScope::Decision(decision)) => {
                    Ok(decision.open_elseif(condition, label, call)?)
                }
                _ => Err(misplaced("elseif", scope, "an 'if'", call).into()),
            }
        })
    }

    pub fn else_(&mut self, label: Option<&str>) -> Result<(), BuildError> {
        let label = label.map(str::to_owned);
        self.body.engine.step(|engine, call| {
            let label = optional_text(label, "branch label")?;
            let scope = engine.innermost_kind();
            match engine.innermost_mut() {
                Some(ActivityScope::Decision(decision)) => Ok(decision.open_else(label, call)?),
                _ => Err(misplaced("else", scope, "an 'if'", call).into()),
            }
        })
    }
}

impl<'a> Deref for DecisionBody<'a> {
    type Target = ActivityBody<'a>;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl DerefMut for DecisionBody<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.body
    }
}

/// Body of a `switch`; every element belongs to the most recent `case`.
pub struct SwitchBody<'a> {
    body: ActivityBody<'a>,
}

impl SwitchBody<'_> {
    /// Starts a case. Repeated labels are written as given.
    pub fn case(&mut self, label: impl Into<String>) -> Result<(), BuildError> {
        let label = label.into();
        self.body.engine.step(|engine, call| {
            let label = non_empty(label, "case label")?;
            let scope = engine.innermost_kind();
            match engine.innermost_mut() {
                Some(ActivityScope::Switch(switch)) => {
                    switch.cases.push((label, Vec::new()));
                    Ok(())
                }
                _ => Err(misplaced("case", scope, "a 'switch'", call).into()),
            }
        })
    }
}

impl<'a> Deref for SwitchBody<'a> {
    type Target = ActivityBody<'a>;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl DerefMut for SwitchBody<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.body
    }
}

/// Body of a `while` or `repeat` loop.
pub struct LoopBody<'a> {
    body: ActivityBody<'a>,
}

impl LoopBody<'_> {
    /// Action on the backward edge of a `repeat` loop; must be the last element of the loop.
    pub fn backward(&mut self, text: impl Into<String>) -> Result<(), BuildError> {
        let text = text.into();
        self.body.engine.step(|engine, call| {
            let text = non_empty(text, "backward action")?;
            let scope = engine.innermost_kind();
            match engine.innermost_mut() {
                Some(ActivityScope::Repeat(repeat)) => {
                    if repeat.backward.is_some() {
                        return Err(StructuralError::DuplicateClause {
                            clause: "backward",
                            scope: "repeat",
                            call,
                        }
                        .into());
                    }
                    repeat.backward = Some(text);
                    Ok(())
                }
                _ => Err(misplaced("backward", scope, "a 'repeat'", call).into()),
            }
        })
    }
}

impl<'a> Deref for LoopBody<'a> {
    type Target = ActivityBody<'a>;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl DerefMut for LoopBody<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.body
    }
}

/// Body of a `fork` or `split`: only branches and the fork end style.
pub struct ParallelBody<'a> {
    engine: &'a mut Engine<ActivityGrammar>,
}

impl ParallelBody<'_> {
    pub fn branch(
        &mut self,
        body: impl FnOnce(&mut ActivityBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        self.engine
            .scoped(|_, _| Ok(ActivityScope::branch()), |engine| body(&mut ActivityBody { engine }))
    }

    /// Ends the fork with `end merge`.
    pub fn end_merge(&mut self) -> Result<(), BuildError> {
        self.set_end(ForkEnd::Merge)
    }

    /// Ends the fork with `end fork {label}`.
    pub fn end_join(&mut self, label: impl Into<String>) -> Result<(), BuildError> {
        let label = label.into();
        self.engine.step(|engine, call| {
            let label = single_line(label, "join label")?;
            set_fork_end(engine, ForkEnd::Join(label), call)
        })
    }

    fn set_end(&mut self, end: ForkEnd) -> Result<(), BuildError> {
        self.engine.step(|engine, call| set_fork_end(engine, end, call))
    }
}

fn set_fork_end(
    engine: &mut Engine<ActivityGrammar>,
    end: ForkEnd,
    call: usize,
) -> Result<(), BuildError> {
    let scope = engine.innermost_kind();
    match engine.innermost_mut() {
        Some(ActivityScope::Parallel(parallel)) => parallel.set_end(end, call),
        _ => Err(misplaced("end style", scope, "a 'fork'", call).into()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ActionSpec, ActivityDiagram, ActivityScope, IfSpec, SwimlaneSpec};
    use crate::build::ScopeFrame;
    use crate::error::{BuildError, StructuralError, ValidationError};
    use crate::model::{ActionShape, ActivityNode, Color, Diagram, ParallelKind};

    fn nodes(diagram: &Diagram) -> &[ActivityNode] {
        diagram.as_activity().expect("activity diagram").nodes()
    }

    #[test]
    fn linear_flow_keeps_call_order() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        body.start().expect("start");
        body.action_with(ActionSpec::new("Ship").with_shape(ActionShape::Send)).expect("action");
        body.stop().expect("stop");

        let diagram = diagram.finish().expect("finish");
        let kinds: Vec<_> = nodes(&diagram).iter().map(ActivityNode::kind_name).collect();
        assert_eq!(kinds, vec!["start", "action", "stop"]);
    }

    #[test]
    fn second_else_fails_before_mutating_the_decision() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram
            .body()
            .if_(IfSpec::new("ok?").with_label("yes"), |decision| {
                decision.action("a")?;
                decision.else_(Some("no"))?;
                decision.action("b")?;
                decision.else_(None)
            })
            .expect_err("duplicate else");
        assert_eq!(err, BuildError::Structural(StructuralError::DuplicateElse { call: 5 }));
        assert_eq!(diagram.engine().depth(), 0);
        assert!(matches!(
            diagram.finish(),
            Err(BuildError::Structural(StructuralError::Abandoned { failed_at: 5 }))
        ));
    }

    #[test]
    fn elseif_after_else_is_rejected() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram
            .body()
            .if_("x?", |decision| {
                decision.else_(None)?;
                decision.elseif("y?")
            })
            .expect_err("elseif after else");
        assert!(matches!(err, BuildError::Structural(StructuralError::BranchAfterElse { .. })));
    }

    #[test]
    fn switch_requires_a_case_before_content() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram.body().switch("mode", |switch| switch.action("x")).expect_err("no case");
        assert_eq!(
            err.as_structural(),
            Some(&StructuralError::Misplaced {
                what: "action",
                scope: "switch",
                expected: "a 'case' first",
                call: 2
            })
        );
    }

    #[test]
    fn switch_tolerates_duplicate_case_labels() {
        let mut diagram = ActivityDiagram::new();
        diagram
            .body()
            .switch("mode", |switch| {
                switch.case("a")?;
                switch.action("first")?;
                switch.case("a")?;
                switch.action("second")
            })
            .expect("switch");
        let diagram = diagram.finish().expect("finish");
        let ActivityNode::Switch(switch) = &nodes(&diagram)[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch.cases().len(), 2);
    }

    #[test]
    fn break_outside_loop_names_the_innermost_scope() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram.body().group("g", |group| group.break_()).expect_err("break");
        assert_eq!(
            err.as_structural(),
            Some(&StructuralError::BreakOutsideLoop { scope: "group", call: 2 })
        );
    }

    #[test]
    fn fork_only_accepts_branches() {
        let mut diagram = ActivityDiagram::new();
        diagram
            .body()
            .fork(|fork| {
                fork.branch(|branch| branch.action("A"))?;
                fork.branch(|branch| branch.action("B"))?;
                fork.end_merge()
            })
            .expect("fork");
        diagram
            .body()
            .split(|split| split.branch(|branch| branch.action("C")))
            .expect("split");

        let diagram = diagram.finish().expect("finish");
        let ActivityNode::Parallel(fork) = &nodes(&diagram)[0] else {
            panic!("expected fork");
        };
        assert_eq!(fork.branches().len(), 2);
        let ActivityNode::Parallel(split) = &nodes(&diagram)[1] else {
            panic!("expected split");
        };
        assert_eq!(split.kind(), &ParallelKind::Split);
    }

    #[test]
    fn split_rejects_fork_end_styles() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram.body().split(|split| split.end_merge()).expect_err("end style");
        assert!(matches!(err.as_validation(), Some(ValidationError::IneffectiveOption { .. })));
    }

    #[test]
    fn repeat_backward_is_single_and_last() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram
            .body()
            .repeat("again?", |lp| {
                lp.action("work")?;
                lp.backward("retry")?;
                lp.action("late")
            })
            .expect_err("content after backward");
        assert!(matches!(
            err.as_structural(),
            Some(StructuralError::Misplaced { expected: "nothing after 'backward'", .. })
        ));

        let mut diagram = ActivityDiagram::new();
        let err = diagram
            .body()
            .repeat("again?", |lp| {
                lp.backward("retry")?;
                lp.backward("retry")
            })
            .expect_err("duplicate backward");
        assert!(matches!(
            err.as_structural(),
            Some(StructuralError::DuplicateClause { clause: "backward", .. })
        ));
    }

    #[test]
    fn goto_needs_a_declared_label() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        let err = body.goto("retry").expect_err("unknown label");
        assert!(matches!(
            err.as_structural(),
            Some(StructuralError::UnknownIdentifier { expected: "label", .. })
        ));

        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        body.label("retry").expect("label");
        body.action("try").expect("action");
        body.goto("retry").expect("goto");
        assert!(body.label("retry").is_err());
    }

    #[test]
    fn swimlane_options_only_apply_on_first_use() {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        let blue = Color::new("LightBlue").expect("color");
        body.swimlane(SwimlaneSpec::new("Customer").with_color(blue.clone())).expect("lane");
        body.action("order").expect("action");
        body.swimlane("Shop").expect("lane");
        body.swimlane("Customer").expect("lane switch back");
        let err = body.swimlane(SwimlaneSpec::new("Customer").with_color(blue)).expect_err("color");
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::IneffectiveOption {
                option: "color",
                target: "swimlane",
                reason: "lane options only apply where the lane is first used",
            })
        );
        assert_eq!(diagram.lanes().names(), &["Customer".to_owned(), "Shop".to_owned()]);
    }

    #[test]
    fn empty_texts_are_rejected_at_the_call() {
        let mut diagram = ActivityDiagram::new();
        let err = diagram.body().action("   ").expect_err("empty");
        assert_eq!(err, BuildError::Validation(ValidationError::EmptyText { what: "action text" }));
    }

    #[test]
    fn detached_branch_fails_to_finalize() {
        let err = ActivityScope::branch().into_node(4).expect_err("branch outside a fork");
        assert_eq!(
            err,
            StructuralError::Misplaced {
                what: "branch",
                scope: "diagram",
                expected: "a 'fork' or 'split' around each 'branch'",
                call: 4
            }
        );
    }

    #[test]
    fn branch_is_not_adopted_by_a_sequential_scope() {
        let mut group = ActivityScope::group("g").expect("group");
        let err = group.adopt(ActivityScope::branch(), 2).expect_err("branch in group");
        assert!(matches!(err, StructuralError::Misplaced { what: "branch", scope: "group", .. }));
    }
}
