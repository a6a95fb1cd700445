// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! PlantUML text export.
//!
//! Export is deterministic: nodes are written in child order, one production per node, and the
//! same tree with the same [`RenderOptions`] always yields byte-identical text. Labels are
//! escaped per position (see [`unescape`] for the inverse).

use log::info;

use crate::build::MAX_SCOPE_DEPTH;
use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::model::{
    ActivityAst, ClassAst, Color, Diagram, DiagramAst, DiagramKind, DiagramMeta, LinkStyle,
    SequenceAst, StateAst,
};

mod activity;
mod class;
mod escape;
mod sequence;
mod state;

pub use escape::unescape;

use escape::{escape_into, Context, BLOCK, LABEL};

/// Writes a finalized diagram, including its name and metadata, as PlantUML text.
pub fn export_diagram(diagram: &Diagram, options: &RenderOptions) -> Result<String, RenderError> {
    document(diagram.kind(), diagram.name(), Some(diagram.meta()), options, |w| {
        match diagram.ast() {
            DiagramAst::Activity(ast) => activity::write_activity(w, ast),
            DiagramAst::Sequence(ast) => sequence::write_sequence(w, ast),
            DiagramAst::State(ast) => state::write_state(w, ast),
            DiagramAst::Class(ast) => class::write_class(w, ast),
        }
    })
}

pub fn export_activity(ast: &ActivityAst, options: &RenderOptions) -> Result<String, RenderError> {
    document(DiagramKind::Activity, None, None, options, |w| activity::write_activity(w, ast))
}

pub fn export_sequence(ast: &SequenceAst, options: &RenderOptions) -> Result<String, RenderError> {
    document(DiagramKind::Sequence, None, None, options, |w| sequence::write_sequence(w, ast))
}

pub fn export_state(ast: &StateAst, options: &RenderOptions) -> Result<String, RenderError> {
    document(DiagramKind::State, None, None, options, |w| state::write_state(w, ast))
}

pub fn export_class(ast: &ClassAst, options: &RenderOptions) -> Result<String, RenderError> {
    document(DiagramKind::Class, None, None, options, |w| class::write_class(w, ast))
}

fn document(
    kind: DiagramKind,
    name: Option<&str>,
    meta: Option<&DiagramMeta>,
    options: &RenderOptions,
    body: impl FnOnce(&mut Writer) -> Result<(), RenderError>,
) -> Result<String, RenderError> {
    let mut w = Writer::new(options);
    if options.wrap {
        let mut line = w.line();
        line.push("@startuml");
        if let Some(name) = name {
            line.push(" ").push(name);
        }
    }
    if let Some(meta) = meta {
        write_preamble(&mut w, meta);
    }
    body(&mut w)?;
    if let Some(legend) = meta.and_then(DiagramMeta::legend) {
        w.line().push("legend");
        w.indented(|w| w.block(legend));
        w.line().push("endlegend");
    }
    if options.wrap {
        w.line().push("@enduml");
    }

    let out = w.finish(options.trailing_newline);
    info!(kind = kind.name(), bytes = out.len(); "Exported PlantUML diagram");
    Ok(out)
}

fn write_preamble(w: &mut Writer, meta: &DiagramMeta) {
    if let Some(theme) = meta.theme() {
        w.line().push("!theme ").push(theme);
    }
    for include in meta.includes() {
        w.line().push("!include ").push(include);
    }
    for (key, value) in meta.skinparams() {
        w.line().push("skinparam ").push(key).push(" ").push(value);
    }
    let headings = [
        ("title", meta.title()),
        ("header", meta.header()),
        ("footer", meta.footer()),
        ("caption", meta.caption()),
    ];
    for (keyword, text) in headings {
        if let Some(text) = text {
            w.line().push(keyword).push(" ").text(text, LABEL);
        }
    }
}

/// Fails when a walk reaches nodes nested more than [`MAX_SCOPE_DEPTH`] scopes deep. Hand-built
/// trees skip the builder's limit, so every recursive walk checks again.
fn check_depth(depth: usize) -> Result<(), RenderError> {
    if depth > MAX_SCOPE_DEPTH {
        return Err(RenderError::NestingTooDeep { max: MAX_SCOPE_DEPTH });
    }
    Ok(())
}

/// Indentation-aware output buffer.
pub(crate) struct Writer {
    out: String,
    unit: usize,
    depth: usize,
}

impl Writer {
    fn new(options: &RenderOptions) -> Self {
        Self { out: String::with_capacity(256), unit: usize::from(options.indent), depth: 0 }
    }

    /// Starts an indented line; the newline is written when the returned [`Line`] drops.
    pub(crate) fn line(&mut self) -> Line<'_> {
        for _ in 0..self.depth * self.unit {
            self.out.push(' ');
        }
        Line { out: &mut self.out }
    }

    pub(crate) fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    /// Writes multi-line text (note and legend bodies), one escaped line at a time.
    pub(crate) fn block(&mut self, text: &str) {
        let mut escaped = String::with_capacity(text.len());
        escape_into(&mut escaped, text, BLOCK);
        for part in escaped.split('\n') {
            if part.is_empty() {
                self.out.push('\n');
            } else {
                self.line().push(part);
            }
        }
    }

    /// Writes `opening`, the indented body and `closing` on their own lines.
    pub(crate) fn note_block(
        &mut self,
        opening: impl FnOnce(&mut Line<'_>),
        text: &str,
        closing: &str,
    ) {
        opening(&mut self.line());
        self.indented(|w| w.block(text));
        self.line().push(closing);
    }

    fn finish(mut self, trailing_newline: bool) -> String {
        if !trailing_newline && self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

/// One output line under construction.
pub(crate) struct Line<'a> {
    out: &'a mut String,
}

impl Line<'_> {
    /// Appends syntax verbatim.
    pub(crate) fn push(&mut self, syntax: &str) -> &mut Self {
        self.out.push_str(syntax);
        self
    }

    /// Appends user text escaped for the given position.
    pub(crate) fn text(&mut self, text: &str, ctx: Context) -> &mut Self {
        escape_into(self.out, text, ctx);
        self
    }

    pub(crate) fn number(&mut self, value: impl itoa::Integer) -> &mut Self {
        self.out.push_str(itoa::Buffer::new().format(value));
        self
    }

    /// Appends ` #color` when a color is set.
    pub(crate) fn color(&mut self, color: Option<&Color>) -> &mut Self {
        if let Some(color) = color {
            self.out.push_str(" #");
            self.out.push_str(color.as_str());
        }
        self
    }

    /// Appends `#color` without a separating space.
    pub(crate) fn color_tight(&mut self, color: &Color) -> &mut Self {
        self.out.push('#');
        self.out.push_str(color.as_str());
        self
    }

    /// Appends the bracketed arrow modifiers, `[#red,dashed,thickness=2]`, unless empty.
    pub(crate) fn link_style(&mut self, style: &LinkStyle) -> &mut Self {
        if style.is_empty() {
            return self;
        }
        self.out.push('[');
        let mut first = true;
        let mut sep = |out: &mut String| {
            if !first {
                out.push(',');
            }
            first = false;
        };
        if let Some(color) = style.color() {
            sep(self.out);
            self.out.push('#');
            self.out.push_str(color.as_str());
        }
        if let Some(line) = style.line() {
            sep(self.out);
            self.out.push_str(line.keyword());
        }
        if let Some(thickness) = style.thickness() {
            sep(self.out);
            self.out.push_str("thickness=");
            self.out.push_str(itoa::Buffer::new().format(thickness));
        }
        self.out.push(']');
        self
    }
}

impl Drop for Line<'_> {
    fn drop(&mut self) {
        self.out.push('\n');
    }
}

#[cfg(test)]
mod tests;
