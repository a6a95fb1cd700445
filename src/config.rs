// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Deserialize;

use crate::error::ConfigError;

/// Largest accepted indentation step.
pub const MAX_INDENT: u8 = 8;

/// Options controlling how a finalized diagram is written out.
///
/// Options never change the structure of the output, only its layout: indentation, the
/// `@startuml`/`@enduml` envelope and the final newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Spaces per nesting level
    pub indent: u8,

    /// Wrap the body in `@startuml` / `@enduml`
    pub wrap: bool,

    /// End the text with a newline
    pub trailing_newline: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { indent: 2, wrap: true, trailing_newline: true }
    }
}

impl RenderOptions {
    /// Parse options from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent > MAX_INDENT {
            return Err(ConfigError::OutOfRange {
                what: "indent",
                value: u64::from(self.indent),
                min: 0,
                max: u64::from(MAX_INDENT),
            });
        }
        Ok(())
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent.min(MAX_INDENT);
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::RenderOptions;
    use crate::error::ConfigError;

    #[test]
    fn missing_keys_keep_defaults() {
        let options = RenderOptions::from_json_str(r#"{ "indent": 4 }"#).expect("options");
        assert_eq!(options, RenderOptions::default().with_indent(4));
        assert!(options.wrap);
        assert!(options.trailing_newline);
    }

    #[test]
    fn rejects_unknown_keys_and_out_of_range_indent() {
        assert!(matches!(
            RenderOptions::from_json_str(r#"{ "tabs": true }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RenderOptions::from_json_str(r#"{ "indent": 9 }"#),
            Err(ConfigError::OutOfRange { what: "indent", value: 9, .. })
        ));
    }
}
