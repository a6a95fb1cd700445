// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Class diagram front-end.

use super::{DiagramBuilder, Engine, Grammar, ScopeFrame};
use crate::error::{BuildError, StructuralError, ValidationError};
use crate::model::diagram::{non_empty, single_line};
use crate::model::ids::is_bare_name;
use crate::model::{
    Alias, Class, ClassAst, ClassKind, ClassNode, ClassNote, Color, DiagramAst, DiagramKind,
    Direction, LabelArrow, Member, MemberModifier, Package, PackageKind, Relation, RelationKind,
    Side, Visibility,
};

const CLASS: &str = "class";
const PACKAGE: &str = "package";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassGrammar;

impl Grammar for ClassGrammar {
    type Node = ClassNode;
    type Scope = ClassScope;
    type Context = ();

    const KIND: DiagramKind = DiagramKind::Class;

    fn node_kind(node: &ClassNode) -> &'static str {
        node.kind_name()
    }

    fn into_ast(nodes: Vec<ClassNode>) -> DiagramAst {
        DiagramAst::Class(ClassAst::new(nodes))
    }
}

pub type ClassDiagram = DiagramBuilder<ClassGrammar>;

impl DiagramBuilder<ClassGrammar> {
    pub fn body(&mut self) -> ClassBody<'_> {
        ClassBody { engine: self.engine_mut() }
    }
}

/// One attribute or operation line, e.g. `{static} +count() : int`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSpec {
    pub text: String,
    pub visibility: Option<Visibility>,
    pub modifier: Option<MemberModifier>,
}

impl MemberSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn public(text: impl Into<String>) -> Self {
        Self::new(text).with_visibility(Visibility::Public)
    }

    pub fn private(text: impl Into<String>) -> Self {
        Self::new(text).with_visibility(Visibility::Private)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_modifier(mut self, modifier: MemberModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }
}

impl From<&str> for MemberSpec {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: String,
    pub alias: Option<String>,
    pub kind: ClassKind,
    /// Generic parameter written as `Name<T>`.
    pub generic: Option<String>,
    pub stereotype: Option<String>,
    pub color: Option<Color>,
    pub members: Vec<MemberSpec>,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn of_kind(kind: ClassKind, name: impl Into<String>) -> Self {
        Self { kind, ..Self::new(name) }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_generic(mut self, generic: impl Into<String>) -> Self {
        self.generic = Some(generic.into());
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn member(mut self, member: impl Into<MemberSpec>) -> Self {
        self.members.push(member.into());
        self
    }
}

impl From<&str> for ClassSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub kind: PackageKind,
    pub stereotype: Option<String>,
    pub color: Option<Color>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_kind(mut self, kind: PackageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for PackageSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    pub from: String,
    pub kind: RelationKind,
    pub to: String,
    pub from_multiplicity: Option<String>,
    pub to_multiplicity: Option<String>,
    pub label: Option<String>,
    /// Reading direction marker next to the label (`label >`).
    pub label_arrow: Option<LabelArrow>,
    pub direction: Option<Direction>,
    pub color: Option<Color>,
}

impl RelationSpec {
    pub fn new(from: impl Into<String>, kind: RelationKind, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            kind,
            to: to.into(),
            from_multiplicity: None,
            to_multiplicity: None,
            label: None,
            label_arrow: None,
            direction: None,
            color: None,
        }
    }

    pub fn with_multiplicities(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_multiplicity = Some(from.into());
        self.to_multiplicity = Some(to.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_label_arrow(mut self, arrow: LabelArrow) -> Self {
        self.label_arrow = Some(arrow);
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
}

/// An open package (or namespace, frame, folder ...).
#[derive(Debug)]
pub struct ClassScope {
    kind: PackageKind,
    name: String,
    stereotype: Option<String>,
    color: Option<Color>,
    children: Vec<ClassNode>,
}

impl ClassScope {
    pub fn package(spec: PackageSpec) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: spec.kind,
            name: single_line(spec.name, "package name")?,
            stereotype: spec
                .stereotype
                .map(|stereotype| single_line(stereotype, "stereotype"))
                .transpose()?,
            color: spec.color,
            children: Vec::new(),
        })
    }
}

impl ScopeFrame for ClassScope {
    type Node = ClassNode;

    fn kind(&self) -> &'static str {
        PACKAGE
    }

    fn push(&mut self, node: ClassNode, _call: usize) -> Result<(), StructuralError> {
        self.children.push(node);
        Ok(())
    }

    fn into_node(self, _call: usize) -> Result<ClassNode, StructuralError> {
        Ok(ClassNode::Package(
            Package::new(self.kind, self.name, self.children)
                .with_stereotype(self.stereotype)
                .with_color(self.color),
        ))
    }
}

fn member(spec: MemberSpec) -> Result<Member, ValidationError> {
    Ok(Member::new(single_line(spec.text, "class member")?)
        .with_visibility(spec.visibility)
        .with_modifier(spec.modifier))
}

fn single_line_opt(
    text: Option<String>,
    what: &'static str,
) -> Result<Option<String>, ValidationError> {
    text.map(|text| single_line(text, what)).transpose()
}

pub struct ClassBody<'a> {
    engine: &'a mut Engine<ClassGrammar>,
}

impl ClassBody<'_> {
    /// Declares a class-like element; names that are not bare identifiers get a generated alias.
    pub fn class(&mut self, spec: impl Into<ClassSpec>) -> Result<Alias, BuildError> {
        let spec = spec.into();
        self.engine.step(|engine, call| {
            let name = single_line(spec.name, "class name")?;
            let generic = single_line_opt(spec.generic, "generic parameter")?;
            let stereotype = single_line_opt(spec.stereotype, "stereotype")?;
            let members = spec.members.into_iter().map(member).collect::<Result<Vec<_>, _>>()?;
            let (alias, display) = match spec.alias {
                Some(alias) => {
                    let alias = Alias::new(alias)?;
                    let display = (name != alias.as_str()).then_some(name);
                    (alias, display)
                }
                None if is_bare_name(&name) => (Alias::new(&name)?, None),
                None => (engine.registry_mut().generate("c"), Some(name)),
            };
            engine.registry_mut().declare(alias.clone(), CLASS, call)?;
            let class = Class::new(spec.kind, alias.clone())
                .with_display(display)
                .with_generic(generic)
                .with_stereotype(stereotype)
                .with_color(spec.color)
                .with_members(members);
            engine.append(ClassNode::Class(class), call)?;
            Ok(alias)
        })
    }

    pub fn package(
        &mut self,
        spec: impl Into<PackageSpec>,
        body: impl FnOnce(&mut ClassBody<'_>) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let spec = spec.into();
        self.engine.scoped(
            |_, _| Ok(ClassScope::package(spec)?),
            |engine| body(&mut ClassBody { engine }),
        )
    }

    /// Relates two declared classes.
    pub fn relation(&mut self, spec: RelationSpec) -> Result<(), BuildError> {
        self.engine.step(|engine, call| {
            let from = engine.aliases().require(&spec.from, CLASS, call)?;
            let to = engine.aliases().require(&spec.to, CLASS, call)?;
            let label = single_line_opt(spec.label, "relation label")?;
            if label.is_none() && spec.label_arrow.is_some() {
                return Err(ValidationError::IneffectiveOption {
                    option: "label arrow",
                    target: "unlabeled relation",
                    reason: "the arrow is drawn next to the label",
                }
                .into());
            }
            let relation = Relation::new(from, spec.kind, to)
                .with_multiplicities(
                    single_line_opt(spec.from_multiplicity, "multiplicity")?,
                    single_line_opt(spec.to_multiplicity, "multiplicity")?,
                )
                .with_label(label, spec.label_arrow)
                .with_direction(spec.direction)
                .with_color(spec.color);
            engine.append(ClassNode::Relation(relation), call)
        })
    }

    /// Attaches a note to one side of a declared class.
    pub fn note(
        &mut self,
        side: Side,
        target: &str,
        text: impl Into<String>,
        color: Option<Color>,
    ) -> Result<(), BuildError> {
        let text = text.into();
        self.engine.step(|engine, call| {
            let target = engine.aliases().require(target, CLASS, call)?;
            let text = non_empty(text, "note text")?;
            let note = ClassNote::attached(side, target, text).with_color(color);
            engine.append(ClassNode::Note(note), call)
        })
    }

    /// Places a note that is not attached to any class.
    pub fn floating_note(
        &mut self,
        text: impl Into<String>,
        color: Option<Color>,
    ) -> Result<(), BuildError> {
        let text = text.into();
        self.engine.step(|engine, call| {
            let text = non_empty(text, "note text")?;
            engine.append(ClassNode::Note(ClassNote::floating(text).with_color(color)), call)
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ClassDiagram, ClassSpec, MemberSpec, PackageSpec, RelationSpec};
    use crate::error::{StructuralError, ValidationError};
    use crate::model::{
        ClassKind, ClassNode, LabelArrow, MemberModifier, PackageKind, RelationKind, Side,
    };

    #[test]
    fn packages_nest_classes_and_relations() {
        let mut diagram = ClassDiagram::new();
        let mut body = diagram.body();
        body.package(PackageSpec::new("shop").with_kind(PackageKind::Namespace), |shop| {
            let order = shop.class(
                ClassSpec::new("Order")
                    .member(MemberSpec::public("total() : Money"))
                    .member(MemberSpec::private("lines").with_modifier(MemberModifier::Static)),
            )?;
            let line = shop.class("OrderLine")?;
            shop.relation(
                RelationSpec::new(order.as_str(), RelationKind::Composition, line.as_str())
                    .with_multiplicities("1", "*"),
            )
        })
        .expect("package");
        body.note(Side::Right, "Order", "aggregate root", None).expect("note");

        let diagram = diagram.finish().expect("finish");
        let nodes = diagram.as_class().expect("class").nodes();
        assert_eq!(nodes.len(), 2);
        let ClassNode::Package(package) = &nodes[0] else {
            panic!("expected package");
        };
        assert_eq!(package.children().len(), 3);
        let ClassNode::Class(order) = &package.children()[0] else {
            panic!("expected class");
        };
        assert_eq!(order.members().len(), 2);
    }

    #[test]
    fn display_names_get_generated_aliases() {
        let mut diagram = ClassDiagram::new();
        let mut body = diagram.body();
        let repo = body
            .class(ClassSpec::of_kind(ClassKind::Interface, "Order Repository"))
            .expect("class");
        let named = body.class(ClassSpec::new("Sql Store").with_alias("SqlStore")).expect("class");
        assert_eq!(repo.as_str(), "__c1");
        assert_eq!(named.as_str(), "SqlStore");
        body.relation(RelationSpec::new("SqlStore", RelationKind::Implementation, "__c1"))
            .expect("relation");
    }

    #[rstest]
    #[case("Missing", "Order")]
    #[case("Order", "Missing")]
    fn relations_require_declared_classes(#[case] from: &str, #[case] to: &str) {
        let mut diagram = ClassDiagram::new();
        let mut body = diagram.body();
        body.class("Order").expect("class");
        let err = body
            .relation(RelationSpec::new(from, RelationKind::Association, to))
            .expect_err("undeclared class");
        assert!(matches!(
            err.as_structural(),
            Some(StructuralError::UnknownIdentifier { expected: "class", call: 2, .. })
        ));
    }

    #[test]
    fn label_arrow_needs_a_label() {
        let mut diagram = ClassDiagram::new();
        let mut body = diagram.body();
        body.class("A").expect("class");
        body.class("B").expect("class");
        let err = body
            .relation(
                RelationSpec::new("A", RelationKind::Directed, "B")
                    .with_label_arrow(LabelArrow::Forward),
            )
            .expect_err("arrow without label");
        assert!(matches!(err.as_validation(), Some(ValidationError::IneffectiveOption { .. })));
    }

    #[test]
    fn duplicate_class_is_rejected() {
        let mut diagram = ClassDiagram::new();
        let mut body = diagram.body();
        body.class("Order").expect("class");
        let err = body.class("Order").expect_err("duplicate");
        assert!(matches!(
            err.as_structural(),
            Some(StructuralError::DuplicateIdentifier { existing: "class", call: 2, .. })
        ));
    }
}
