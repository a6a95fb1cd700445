// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::{AliasError, ValidationError};

/// Prefix reserved for aliases generated by the builders.
pub const GENERATED_PREFIX: &str = "__";

/// Short name addressing one element (participant, state, class, jump label) within a diagram.
///
/// Caller aliases must start with an ASCII letter and continue with ASCII letters, digits, `_`
/// or `.`. Aliases starting with [`GENERATED_PREFIX`] can only be produced by the builders, so
/// generated and caller-supplied aliases never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias {
    value: SmolStr,
}

impl Alias {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref();
        validate_alias(value)
            .map_err(|reason| ValidationError::InvalidAlias { value: value.to_owned(), reason })?;
        Ok(Self { value: SmolStr::new(value) })
    }

    pub(crate) fn generated(prefix: &str, index: u32) -> Self {
        let mut buf = itoa::Buffer::new();
        let mut value = String::with_capacity(GENERATED_PREFIX.len() + prefix.len() + 4);
        value.push_str(GENERATED_PREFIX);
        value.push_str(prefix);
        value.push_str(buf.format(index));
        Self { value: SmolStr::new(value) }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_generated(&self) -> bool {
        self.value.starts_with(GENERATED_PREFIX)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Alias {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Alias {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Alias {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn validate_alias(value: &str) -> Result<(), AliasError> {
    let Some(first) = value.chars().next() else {
        return Err(AliasError::Empty);
    };
    if value.starts_with(GENERATED_PREFIX) {
        return Err(AliasError::Reserved);
    }
    if !first.is_ascii_alphabetic() {
        return Err(AliasError::InvalidStart { ch: first });
    }
    if let Some(ch) = value.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '.')
    {
        return Err(AliasError::InvalidChar { ch });
    }
    Ok(())
}

/// Returns true when `name` can be written bare (without quoting) wherever PlantUML expects
/// an element name.
pub(crate) fn is_bare_name(name: &str) -> bool {
    validate_alias(name).is_ok()
}
