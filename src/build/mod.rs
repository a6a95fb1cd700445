// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Builder engine and the per-diagram front-ends.
//!
//! [`Engine`] owns the root node list, a strict LIFO stack of open scopes and the alias
//! registry of one diagram. Every public call is numbered; the first failing call poisons the
//! engine and all later calls fail with [`StructuralError::Abandoned`]. A failing call never
//! changes the tree.
//!
//! The front-ends ([`activity`], [`sequence`], [`state`], [`class`]) pair every open with
//! exactly one close by running scope bodies inside closures ([`Engine::scoped`]).

use std::fmt;

use log::{debug, trace};

use crate::error::{BuildError, StructuralError, ValidationError};
use crate::model::diagram::{non_empty, single_line};
use crate::model::{Alias, Diagram, DiagramAst, DiagramKind, DiagramMeta};

pub mod activity;
pub mod class;
mod registry;
pub mod sequence;
pub mod state;

pub use activity::{ActivityBody, ActivityDiagram, ActivityGrammar, ActivityScope};
pub use class::{ClassBody, ClassDiagram, ClassGrammar, ClassScope};
pub use registry::AliasRegistry;
pub use sequence::{SequenceBody, SequenceDiagram, SequenceGrammar, SequenceScope};
pub use state::{StateBody, StateDiagram, StateGrammar, StateScope};

/// Scope kind reported for the root of a diagram.
pub const ROOT_KIND: &str = "diagram";

/// Maximum number of scopes open at once. Exporters enforce the same bound on hand-built trees.
pub const MAX_SCOPE_DEPTH: usize = 64;

/// One diagram grammar: its node type, its open-scope type and per-build context.
pub trait Grammar {
    type Node: fmt::Debug;
    type Scope: ScopeFrame<Node = Self::Node>;
    /// Diagram-wide bookkeeping that is not part of any scope (activity swimlanes).
    type Context: Default;

    const KIND: DiagramKind;

    fn node_kind(node: &Self::Node) -> &'static str;

    fn into_ast(nodes: Vec<Self::Node>) -> DiagramAst;
}

/// An open construct accumulating children until it is closed.
///
/// `push` and `adopt` must validate before mutating, so a rejected child leaves the scope as
/// it was.
pub trait ScopeFrame: Sized {
    type Node;

    fn kind(&self) -> &'static str;

    fn is_loop(&self) -> bool {
        false
    }

    /// Checks whether this scope may be opened directly at the diagram root.
    fn fits_root(&self) -> Result<(), &'static str> {
        Ok(())
    }

    /// Checks whether `child` may be opened inside this scope; `Err` describes what is expected.
    fn admits(&self, child: &Self) -> Result<(), &'static str> {
        let _ = child;
        Ok(())
    }

    fn push(&mut self, node: Self::Node, call: usize) -> Result<(), StructuralError>;

    /// Attaches a closed child scope.
    fn adopt(&mut self, child: Self, call: usize) -> Result<(), StructuralError> {
        self.push(child.into_node(call)?, call)
    }

    /// Finalizes a closed scope into its node.
    fn into_node(self, call: usize) -> Result<Self::Node, StructuralError>;
}

/// Handle for one open scope, returned by [`Engine::open`] and consumed by [`Engine::close`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open scope must be closed before the diagram is finished"]
pub struct ScopeToken {
    depth: usize,
    serial: u64,
    kind: &'static str,
}

impl ScopeToken {
    /// Number of scopes that were open below this one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

#[derive(Debug)]
struct Frame<S> {
    scope: S,
    serial: u64,
    opened_at: usize,
}

pub struct Engine<G: Grammar> {
    root: Vec<G::Node>,
    stack: Vec<Frame<G::Scope>>,
    aliases: AliasRegistry,
    context: G::Context,
    calls: usize,
    next_serial: u64,
    failed_at: Option<usize>,
}

impl<G: Grammar> fmt::Debug for Engine<G>
where
    G::Scope: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("kind", &G::KIND)
            .field("root", &self.root)
            .field("stack", &self.stack)
            .field("calls", &self.calls)
            .field("failed_at", &self.failed_at)
            .finish_non_exhaustive()
    }
}

impl<G: Grammar> Default for Engine<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar> Engine<G> {
    pub fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
            aliases: AliasRegistry::new(),
            context: G::Context::default(),
            calls: 0,
            next_serial: 0,
            failed_at: None,
        }
    }

    /// Number of calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of scopes currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Call index of the call that poisoned this engine.
    pub fn failed_at(&self) -> Option<usize> {
        self.failed_at
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn context(&self) -> &G::Context {
        &self.context
    }

    /// Kind of the innermost open scope, or [`ROOT_KIND`].
    pub fn innermost_kind(&self) -> &'static str {
        self.stack.last().map_or(ROOT_KIND, |frame| frame.scope.kind())
    }

    /// Walks outward from the innermost open scope and returns the first scope matching `pred`.
    pub fn enclosing(&self, pred: impl Fn(&G::Scope) -> bool) -> Option<&G::Scope> {
        self.stack.iter().rev().map(|frame| &frame.scope).find(|scope| pred(scope))
    }

    /// Appends `node` as the last child of the innermost scope.
    pub fn leaf(&mut self, node: G::Node) -> Result<(), BuildError> {
        self.step(|engine, call| engine.append(node, call))
    }

    pub fn open(&mut self, scope: G::Scope) -> Result<ScopeToken, BuildError> {
        self.step(|engine, call| engine.push_scope(scope, call))
    }

    /// Closes the scope named by `token`, which must be the innermost one.
    pub fn close(&mut self, token: ScopeToken) -> Result<(), BuildError> {
        self.step(|engine, call| engine.pop_scope(token, call))
    }

    /// Opens the scope built by `make`, runs `body` inside it and closes it.
    ///
    /// On success the scope is closed regularly; if `body` fails the scope and everything
    /// opened inside it is discarded and the engine stays poisoned.
    pub fn scoped<T>(
        &mut self,
        make: impl FnOnce(&mut Self, usize) -> Result<G::Scope, BuildError>,
        body: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        let ((), value) =
            self.scoped_with(|engine, call| Ok((make(engine, call)?, ())), body)?;
        Ok(value)
    }

    /// Like [`Engine::scoped`], but `make` also hands back a value produced while opening
    /// (the alias of a composite state, for example).
    pub(crate) fn scoped_with<U, T>(
        &mut self,
        make: impl FnOnce(&mut Self, usize) -> Result<(G::Scope, U), BuildError>,
        body: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<(U, T), BuildError> {
        let (token, opened) = self.step(|engine, call| {
            let (scope, opened) = make(engine, call)?;
            Ok((engine.push_scope(scope, call)?, opened))
        })?;
        match body(self) {
            Ok(value) => {
                self.close(token)?;
                Ok((opened, value))
            }
            Err(err) => {
                self.discard(token);
                Err(err)
            }
        }
    }

    pub fn declare(&mut self, alias: Alias, kind: &'static str) -> Result<(), BuildError> {
        self.step(|engine, call| Ok(engine.aliases.declare(alias, kind, call)?))
    }

    pub fn require(&mut self, alias: &str, kind: &'static str) -> Result<Alias, BuildError> {
        self.step(|engine, call| Ok(engine.aliases.require(alias, kind, call)?))
    }

    /// Produces a fresh alias in the reserved generated namespace (`__{prefix}{n}`).
    pub fn generate(&mut self, prefix: &str) -> Result<Alias, BuildError> {
        self.step(|engine, _| Ok(engine.aliases.generate(prefix)))
    }

    /// Finalizes the root node list; every scope must be closed.
    pub fn finish(self) -> Result<Vec<G::Node>, StructuralError> {
        if let Some(failed_at) = self.failed_at {
            return Err(StructuralError::Abandoned { failed_at });
        }
        if let Some(frame) = self.stack.last() {
            return Err(StructuralError::UnclosedScope {
                kind: frame.scope.kind(),
                opened_at: frame.opened_at,
                open: self.stack.len(),
            });
        }
        debug!(
            kind = G::KIND.name(), nodes = self.root.len(), calls = self.calls;
            "Diagram finalized",
        );
        Ok(self.root)
    }

    /// Runs one numbered call. A failure poisons the engine.
    pub(crate) fn step<T>(
        &mut self,
        op: impl FnOnce(&mut Self, usize) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        if let Some(failed_at) = self.failed_at {
            return Err(StructuralError::Abandoned { failed_at }.into());
        }
        self.calls += 1;
        let call = self.calls;
        let result = op(self, call);
        if let Err(err) = &result {
            debug!(call, kind = G::KIND.name(), error:% = err; "Builder call failed");
            self.failed_at = Some(call);
        }
        result
    }

    pub(crate) fn append(&mut self, node: G::Node, call: usize) -> Result<(), BuildError> {
        trace!(call, node = G::node_kind(&node), scope = self.innermost_kind(); "Append node");
        match self.stack.last_mut() {
            Some(frame) => frame.scope.push(node, call)?,
            None => self.root.push(node),
        }
        Ok(())
    }

    pub(crate) fn push_scope(
        &mut self,
        scope: G::Scope,
        call: usize,
    ) -> Result<ScopeToken, BuildError> {
        let placement = match self.stack.last() {
            Some(frame) => frame.scope.admits(&scope),
            None => scope.fits_root(),
        };
        if let Err(expected) = placement {
            return Err(StructuralError::Misplaced {
                what: scope.kind(),
                scope: self.innermost_kind(),
                expected,
                call,
            }
            .into());
        }
        if self.stack.len() >= MAX_SCOPE_DEPTH {
            return Err(StructuralError::NestingTooDeep {
                depth: self.stack.len() + 1,
                max: MAX_SCOPE_DEPTH,
                call,
            }
            .into());
        }

        self.next_serial += 1;
        let token =
            ScopeToken { depth: self.stack.len(), serial: self.next_serial, kind: scope.kind() };
        debug!(call, scope = token.kind, depth = token.depth; "Open scope");
        self.stack.push(Frame { scope, serial: token.serial, opened_at: call });
        Ok(token)
    }

    pub(crate) fn pop_scope(&mut self, token: ScopeToken, call: usize) -> Result<(), BuildError> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.serial == token.serial => frame,
            Some(frame) => {
                let innermost = frame.scope.kind();
                self.stack.push(frame);
                return Err(StructuralError::OutOfOrderClose {
                    requested: token.kind,
                    innermost,
                    call,
                }
                .into());
            }
            None => {
                return Err(StructuralError::CloseWithoutOpen { requested: token.kind, call }.into())
            }
        };

        debug!(call, scope = token.kind, depth = token.depth; "Close scope");
        match self.stack.last_mut() {
            Some(parent) => parent.scope.adopt(frame.scope, call)?,
            None => self.root.push(frame.scope.into_node(call)?),
        }
        Ok(())
    }

    /// Drops the scope named by `token` together with everything opened inside it.
    pub(crate) fn discard(&mut self, token: ScopeToken) {
        debug!(scope = token.kind, depth = token.depth; "Discard scope");
        self.stack.truncate(token.depth);
        if self.failed_at.is_none() {
            self.failed_at = Some(self.calls);
        }
    }

    pub(crate) fn innermost_mut(&mut self) -> Option<&mut G::Scope> {
        self.stack.last_mut().map(|frame| &mut frame.scope)
    }

    pub(crate) fn registry_mut(&mut self) -> &mut AliasRegistry {
        &mut self.aliases
    }

    pub(crate) fn context_mut(&mut self) -> &mut G::Context {
        &mut self.context
    }
}

/// A diagram under construction: the engine plus its name and metadata.
///
/// The front-end modules alias this per grammar ([`ActivityDiagram`], [`SequenceDiagram`],
/// [`StateDiagram`], [`ClassDiagram`]) and add a `body()` handle for authoring.
pub struct DiagramBuilder<G: Grammar> {
    name: Option<String>,
    meta: DiagramMeta,
    engine: Engine<G>,
}

impl<G: Grammar> Default for DiagramBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar> DiagramBuilder<G> {
    pub fn new() -> Self {
        Self { name: None, meta: DiagramMeta::default(), engine: Engine::new() }
    }

    /// Starts a diagram written as `@startuml name`.
    pub fn named(name: impl Into<String>) -> Result<Self, ValidationError> {
        let mut builder = Self::new();
        builder.name = Some(single_line(name.into(), "diagram name")?);
        Ok(builder)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn meta(&self) -> &DiagramMeta {
        &self.meta
    }

    /// Title, legend, skin parameters and the other pass-through settings.
    pub fn meta_mut(&mut self) -> &mut DiagramMeta {
        &mut self.meta
    }

    pub fn engine(&self) -> &Engine<G> {
        &self.engine
    }

    /// Direct access to the engine, for callers assembling scopes by hand.
    pub fn engine_mut(&mut self) -> &mut Engine<G> {
        &mut self.engine
    }

    pub fn finish(self) -> Result<Diagram, BuildError> {
        let nodes = self.engine.finish()?;
        Ok(Diagram::new(self.name, self.meta, G::into_ast(nodes)))
    }
}

impl<G: Grammar> fmt::Debug for DiagramBuilder<G>
where
    G::Scope: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramBuilder")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("engine", &self.engine)
            .finish()
    }
}

pub(crate) fn optional_text(
    text: Option<String>,
    what: &'static str,
) -> Result<Option<String>, ValidationError> {
    text.map(|text| non_empty(text, what)).transpose()
}
