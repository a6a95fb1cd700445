// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::Alias;
use super::style::{Color, Direction, Side};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassAst {
    nodes: Vec<ClassNode>,
}

impl ClassAst {
    pub fn new(nodes: Vec<ClassNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ClassNode] {
        &self.nodes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassNode {
    Class(Class),
    Package(Package),
    Relation(Relation),
    Note(ClassNote),
}

impl ClassNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Class(class) => class.kind().keyword(),
            Self::Package(package) => package.kind().keyword(),
            Self::Relation(_) => "relation",
            Self::Note(_) => "note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Abstract,
    Interface,
    Enum,
    Annotation,
    Entity,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Abstract => "abstract class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
            Self::Entity => "entity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
}

impl Visibility {
    pub fn marker(self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
            Self::Package => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberModifier {
    Static,
    Abstract,
}

impl MemberModifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Static => "{static}",
            Self::Abstract => "{abstract}",
        }
    }
}

/// One line inside a class body: a field, a method (text ending in `)`) or an enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    text: String,
    visibility: Option<Visibility>,
    modifier: Option<MemberModifier>,
}

impl Member {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), visibility: None, modifier: None }
    }

    pub fn with_visibility(mut self, visibility: Option<Visibility>) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modifier(mut self, modifier: Option<MemberModifier>) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    pub fn modifier(&self) -> Option<MemberModifier> {
        self.modifier
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    kind: ClassKind,
    alias: Alias,
    display: Option<String>,
    generic: Option<String>,
    stereotype: Option<String>,
    color: Option<Color>,
    members: Vec<Member>,
}

impl Class {
    pub fn new(kind: ClassKind, alias: Alias) -> Self {
        Self {
            kind,
            alias,
            display: None,
            generic: None,
            stereotype: None,
            color: None,
            members: Vec::new(),
        }
    }

    pub fn with_display(mut self, display: Option<String>) -> Self {
        self.display = display;
        self
    }

    pub fn with_generic(mut self, generic: Option<String>) -> Self {
        self.generic = generic;
        self
    }

    pub fn with_stereotype(mut self, stereotype: Option<String>) -> Self {
        self.stereotype = stereotype;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Generic parameter written as `Name<T>`.
    pub fn generic(&self) -> Option<&str> {
        self.generic.as_deref()
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageKind {
    #[default]
    Package,
    Namespace,
    Rectangle,
    Frame,
    Folder,
    Node,
    Cloud,
    Database,
}

impl PackageKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Namespace => "namespace",
            Self::Rectangle => "rectangle",
            Self::Frame => "frame",
            Self::Folder => "folder",
            Self::Node => "node",
            Self::Cloud => "cloud",
            Self::Database => "database",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    kind: PackageKind,
    name: String,
    stereotype: Option<String>,
    color: Option<Color>,
    children: Vec<ClassNode>,
}

impl Package {
    pub fn new(kind: PackageKind, name: impl Into<String>, children: Vec<ClassNode>) -> Self {
        Self { kind, name: name.into(), stereotype: None, color: None, children }
    }

    pub fn with_stereotype(mut self, stereotype: Option<String>) -> Self {
        self.stereotype = stereotype;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn children(&self) -> &[ClassNode] {
        &self.children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Extension,
    Implementation,
    Composition,
    Aggregation,
    Association,
    Directed,
    Dependency,
    Link,
}

impl RelationKind {
    /// Head drawn on the `from` side, the line character and the head on the `to` side.
    pub fn parts(self) -> (&'static str, char, &'static str) {
        match self {
            Self::Extension => ("<|", '-', ""),
            Self::Implementation => ("<|", '.', ""),
            Self::Composition => ("*", '-', ""),
            Self::Aggregation => ("o", '-', ""),
            Self::Association => ("", '-', ""),
            Self::Directed => ("", '-', ">"),
            Self::Dependency => ("", '.', ">"),
            Self::Link => ("", '.', ""),
        }
    }
}

/// Which way the reading arrow next to a relation label points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelArrow {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    from: Alias,
    to: Alias,
    kind: RelationKind,
    from_multiplicity: Option<String>,
    to_multiplicity: Option<String>,
    label: Option<String>,
    label_arrow: Option<LabelArrow>,
    direction: Option<Direction>,
    color: Option<Color>,
}

impl Relation {
    pub fn new(from: Alias, kind: RelationKind, to: Alias) -> Self {
        Self {
            from,
            to,
            kind,
            from_multiplicity: None,
            to_multiplicity: None,
            label: None,
            label_arrow: None,
            direction: None,
            color: None,
        }
    }

    pub fn with_multiplicities(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from_multiplicity = from;
        self.to_multiplicity = to;
        self
    }

    pub fn with_label(mut self, label: Option<String>, arrow: Option<LabelArrow>) -> Self {
        self.label = label;
        self.label_arrow = arrow;
        self
    }

    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn from(&self) -> &Alias {
        &self.from
    }

    pub fn to(&self) -> &Alias {
        &self.to
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn from_multiplicity(&self) -> Option<&str> {
        self.from_multiplicity.as_deref()
    }

    pub fn to_multiplicity(&self) -> Option<&str> {
        self.to_multiplicity.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_arrow(&self) -> Option<LabelArrow> {
        self.label_arrow
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// A note attached to one side of a class, or a free-standing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNote {
    anchor: Option<(Side, Alias)>,
    text: String,
    color: Option<Color>,
}

impl ClassNote {
    pub fn attached(side: Side, target: Alias, text: impl Into<String>) -> Self {
        Self { anchor: Some((side, target)), text: text.into(), color: None }
    }

    pub fn floating(text: impl Into<String>) -> Self {
        Self { anchor: None, text: text.into(), color: None }
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Side and target class; `None` for a free-standing note.
    pub fn anchor(&self) -> Option<(Side, &Alias)> {
        self.anchor.as_ref().map(|(side, target)| (*side, target))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}
