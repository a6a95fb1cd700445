// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error taxonomy shared by the builders, the exporters and the render configuration.
//!
//! Builder calls fail with [`BuildError`], which is either a [`StructuralError`] (scope misuse,
//! unknown or duplicate identifiers) or a [`ValidationError`] (a value outside its domain).
//! Exporters fail with [`RenderError`] only for inconsistent, hand-assembled trees.

use crate::model::Alias;

/// Why a string was rejected as an [`Alias`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AliasError {
    #[error("must not be empty")]
    Empty,
    #[error("must start with an ASCII letter, found '{ch}'")]
    InvalidStart { ch: char },
    #[error("contains invalid character: '{ch}'")]
    InvalidChar { ch: char },
    #[error("the '__' prefix is reserved for generated aliases")]
    Reserved,
}

/// Scope misuse detected while a diagram is being built.
///
/// `call` is the 1-based index of the builder call that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error(
        "call {call}: cannot close '{requested}' while '{innermost}' is the innermost open scope"
    )]
    OutOfOrderClose { requested: &'static str, innermost: &'static str, call: usize },

    #[error("call {call}: cannot close '{requested}': no scope is open")]
    CloseWithoutOpen { requested: &'static str, call: usize },

    #[error(
        "unclosed '{kind}' opened by call {opened_at} ({open} scope(s) still open at finalize)"
    )]
    UnclosedScope { kind: &'static str, opened_at: usize, open: usize },

    #[error("call {call}: 'break' must be nested inside a loop (innermost scope is '{scope}')")]
    BreakOutsideLoop { scope: &'static str, call: usize },

    #[error("call {call}: decision already has an 'else' branch")]
    DuplicateElse { call: usize },

    #[error("call {call}: 'elseif' cannot follow the 'else' branch")]
    BranchAfterElse { call: usize },

    #[error("call {call}: '{clause}' was already given for this '{scope}'")]
    DuplicateClause { clause: &'static str, scope: &'static str, call: usize },

    #[error("call {call}: '{what}' is not allowed inside '{scope}' (expected {expected})")]
    Misplaced { what: &'static str, scope: &'static str, expected: &'static str, call: usize },

    #[error("call {call}: unknown {expected} '{alias}'")]
    UnknownIdentifier { alias: String, expected: &'static str, call: usize },

    #[error("call {call}: identifier '{alias}' is already used by a {existing}")]
    DuplicateIdentifier { alias: Alias, existing: &'static str, call: usize },

    #[error("call {call}: scopes nested {depth} deep exceed the limit of {max}")]
    NestingTooDeep { depth: usize, max: usize, call: usize },

    #[error("build was abandoned after call {failed_at} failed")]
    Abandoned { failed_at: usize },
}

/// A value supplied to an authoring call lies outside its declared domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid color '{value}': expected #RGB, #RRGGBB, #RRGGBBAA or a color name")]
    InvalidColor { value: String },

    #[error("invalid alias '{value}': {reason}")]
    InvalidAlias {
        value: String,
        #[source]
        reason: AliasError,
    },

    #[error("{what} must not be empty")]
    EmptyText { what: &'static str },

    #[error("{what} must fit on a single line")]
    LineBreak { what: &'static str },

    #[error("{what} out of range: {value} (allowed {min}..={max})")]
    OutOfRange { what: &'static str, value: i64, min: i64, max: i64 },

    #[error("option '{option}' has no effect on {target}: {reason}")]
    IneffectiveOption { option: &'static str, target: &'static str, reason: &'static str },
}

/// Error returned by every builder call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl BuildError {
    pub fn as_structural(&self) -> Option<&StructuralError> {
        match self {
            Self::Structural(err) => Some(err),
            Self::Validation(_) => None,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Structural(_) => None,
        }
    }
}

/// Internal consistency violation found while exporting a tree.
///
/// Trees produced by the builders never trigger these; hand-assembled trees can.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{node} references undeclared {expected} '{alias}'")]
    MissingReference { node: &'static str, expected: &'static str, alias: Alias },

    #[error("{node} declares '{alias}' more than once")]
    DuplicateDeclaration { node: &'static str, alias: Alias },

    #[error("tree is nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

/// Render configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid render options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{what} out of range: {value} (allowed {min}..={max})")]
    OutOfRange { what: &'static str, value: u64, min: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::{BuildError, StructuralError, ValidationError};

    #[test]
    fn structural_errors_name_the_construct_and_call() {
        let err =
            StructuralError::OutOfOrderClose { requested: "fork", innermost: "branch", call: 7 };
        assert_eq!(
            err.to_string(),
            "call 7: cannot close 'fork' while 'branch' is the innermost open scope"
        );

        let err = StructuralError::UnclosedScope { kind: "while", opened_at: 3, open: 2 };
        assert_eq!(
            err.to_string(),
            "unclosed 'while' opened by call 3 (2 scope(s) still open at finalize)"
        );
    }

    #[test]
    fn build_error_is_transparent_and_classifiable() {
        let err: BuildError = ValidationError::EmptyText { what: "action text" }.into();
        assert_eq!(err.to_string(), "action text must not be empty");
        assert!(err.as_validation().is_some());
        assert!(err.as_structural().is_none());

        let err: BuildError = StructuralError::DuplicateElse { call: 4 }.into();
        assert!(matches!(err.as_structural(), Some(StructuralError::DuplicateElse { call: 4 })));
    }
}
