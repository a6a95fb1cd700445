// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::activity_ast::ActivityAst;
use super::class_ast::ClassAst;
use super::seq_ast::SequenceAst;
use super::state_ast::StateAst;
use crate::error::ValidationError;

/// The type of diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Activity,
    Sequence,
    State,
    Class,
}

impl DiagramKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Sequence => "sequence",
            Self::State => "state",
            Self::Class => "class",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramAst {
    Activity(ActivityAst),
    Sequence(SequenceAst),
    State(StateAst),
    Class(ClassAst),
}

impl DiagramAst {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Activity(_) => DiagramKind::Activity,
            Self::Sequence(_) => DiagramKind::Sequence,
            Self::State(_) => DiagramKind::State,
            Self::Class(_) => DiagramKind::Class,
        }
    }
}

/// Diagram-level text that passes through to the external renderer unchanged.
///
/// Includes, themes and skin parameters are opaque: they are only checked to be non-empty and
/// single-line so they cannot break the surrounding grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramMeta {
    title: Option<String>,
    header: Option<String>,
    footer: Option<String>,
    caption: Option<String>,
    legend: Option<String>,
    theme: Option<String>,
    includes: Vec<String>,
    skinparams: Vec<(String, String)>,
}

impl DiagramMeta {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Legend text; may span several lines.
    pub fn legend(&self) -> Option<&str> {
        self.legend.as_deref()
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn skinparams(&self) -> &[(String, String)] {
        &self.skinparams
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.title = Some(non_empty(title.into(), "title")?);
        Ok(())
    }

    pub fn set_header(&mut self, header: impl Into<String>) -> Result<(), ValidationError> {
        self.header = Some(non_empty(header.into(), "header")?);
        Ok(())
    }

    pub fn set_footer(&mut self, footer: impl Into<String>) -> Result<(), ValidationError> {
        self.footer = Some(non_empty(footer.into(), "footer")?);
        Ok(())
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) -> Result<(), ValidationError> {
        self.caption = Some(non_empty(caption.into(), "caption")?);
        Ok(())
    }

    pub fn set_legend(&mut self, legend: impl Into<String>) -> Result<(), ValidationError> {
        self.legend = Some(non_empty(legend.into(), "legend")?);
        Ok(())
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<(), ValidationError> {
        self.theme = Some(single_line(theme.into(), "theme")?);
        Ok(())
    }

    pub fn add_include(&mut self, include: impl Into<String>) -> Result<(), ValidationError> {
        self.includes.push(single_line(include.into(), "include")?);
        Ok(())
    }

    pub fn add_skinparam(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let key = single_line(key.into(), "skinparam key")?;
        if key.chars().any(char::is_whitespace) {
            return Err(ValidationError::IneffectiveOption {
                option: "skinparam key",
                target: "diagram",
                reason: "keys cannot contain whitespace",
            });
        }
        let value = single_line(value.into(), "skinparam value")?;
        self.skinparams.push((key, value));
        Ok(())
    }
}

pub(crate) fn non_empty(value: String, what: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyText { what });
    }
    Ok(value)
}

pub(crate) fn single_line(value: String, what: &'static str) -> Result<String, ValidationError> {
    let value = non_empty(value, what)?;
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::LineBreak { what });
    }
    Ok(value)
}

/// A finalized, immutable diagram ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    name: Option<String>,
    meta: DiagramMeta,
    ast: DiagramAst,
}

impl Diagram {
    pub fn new(name: Option<String>, meta: DiagramMeta, ast: DiagramAst) -> Self {
        Self { name, meta, ast }
    }

    /// Name written after `@startuml`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> DiagramKind {
        self.ast.kind()
    }

    pub fn meta(&self) -> &DiagramMeta {
        &self.meta
    }

    pub fn ast(&self) -> &DiagramAst {
        &self.ast
    }

    pub fn as_activity(&self) -> Option<&ActivityAst> {
        match &self.ast {
            DiagramAst::Activity(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceAst> {
        match &self.ast {
            DiagramAst::Sequence(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn as_state(&self) -> Option<&StateAst> {
        match &self.ast {
            DiagramAst::State(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassAst> {
        match &self.ast {
            DiagramAst::Class(ast) => Some(ast),
            _ => None,
        }
    }
}
