// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Value types shared by every diagram grammar.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use smol_str::SmolStr;

use crate::error::ValidationError;

/// A PlantUML color: a hex triplet/sextet/octet or a color name, optionally a two-color
/// gradient joined by one of `|`, `/`, `\` or `-`.
///
/// The value is stored without the leading `#`; [`fmt::Display`] adds it back.
/// Whether a named color exists is decided by the external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    value: SmolStr,
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let single = r"(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8}|[A-Za-z]+)";
        Regex::new(&format!(r"^{single}(?:[|/\\-]{single})?$")).expect("valid color pattern")
    })
}

impl Color {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !color_pattern().is_match(body) {
            return Err(ValidationError::InvalidColor { value: raw.to_owned() });
        }
        Ok(Self { value: SmolStr::new(body) })
    }

    /// The color without its leading `#`.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.value)
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Color {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    Bold,
    Hidden,
}

impl LineStyle {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Solid => "plain",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
            Self::Hidden => "hidden",
        }
    }
}

/// Layout hint placed inside an arrow (`-up->`, `-left-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Placement of a note relative to the element it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Bracketed link modifiers: `-[#red,dashed,thickness=2]->`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LinkStyle {
    color: Option<Color>,
    line: Option<LineStyle>,
    thickness: Option<u8>,
}

impl LinkStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_thickness(mut self, thickness: u8) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn line(&self) -> Option<LineStyle> {
        self.line
    }

    pub fn thickness(&self) -> Option<u8> {
        self.thickness
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.line.is_none() && self.thickness.is_none()
    }
}
