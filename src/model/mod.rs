// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Primitive model: one immutable tree type per diagram grammar plus shared value types.
//!
//! Every field a grammar can carry is representable here, including options the builders do
//! not expose. Trees are normally produced by [`crate::build`], but can be assembled by hand.

pub mod activity_ast;
pub mod class_ast;
pub mod diagram;
pub mod ids;
pub mod seq_ast;
pub mod state_ast;
pub mod style;

pub use activity_ast::{
    Action, ActionShape, ActivityAst, ActivityNode, ActivityNote, Arrow, Branch, Case, Decision,
    ElseBranch, ForkEnd, Group, NoteSide, Parallel, ParallelBranch, ParallelKind, Partition,
    RepeatLoop, Swimlane, Switch, WhileLoop,
};
pub use class_ast::{
    Class, ClassAst, ClassKind, ClassNode, ClassNote, LabelArrow, Member, MemberModifier, Package,
    PackageKind, Relation, RelationKind, Visibility,
};
pub use diagram::{Diagram, DiagramAst, DiagramKind, DiagramMeta};
pub use ids::{Alias, GENERATED_PREFIX};
pub use seq_ast::{
    Activation, Autonumber, MessageEnd, NotePlacement, NoteShape, ParticipantBox, ParticipantKind,
    ParticipantList, SequenceArrow, SequenceAst, SequenceBlock, SequenceBlockKind, SequenceHead,
    SequenceLine, SequenceMessage, SequenceNode, SequenceNote, SequenceParticipant, SequenceRef,
    SequenceSection,
};
pub use state_ast::{
    CompositeState, Region, RegionSeparator, State, StateAst, StateEndpoint, StateKind, StateNode,
    StateNote, Transition,
};
pub use style::{Color, Direction, LineStyle, LinkStyle, Side};
