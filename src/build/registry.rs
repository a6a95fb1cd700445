// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::error::StructuralError;
use crate::model::Alias;

/// Identifiers declared within one diagram, with the kind of element that owns each.
///
/// The generation counter lives here, so generated aliases are unique per build and never
/// shared across builders.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    entries: BTreeMap<Alias, &'static str>,
    generated: u32,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kind of the element that declared `alias`, if any.
    pub fn kind_of(&self, alias: &str) -> Option<&'static str> {
        self.entries.get(alias).copied()
    }

    pub(crate) fn declare(
        &mut self,
        alias: Alias,
        kind: &'static str,
        call: usize,
    ) -> Result<(), StructuralError> {
        if let Some(&existing) = self.entries.get(alias.as_str()) {
            return Err(StructuralError::DuplicateIdentifier { alias, existing, call });
        }
        self.entries.insert(alias, kind);
        Ok(())
    }

    /// Resolves `alias` to a declared identifier of the given kind.
    pub(crate) fn require(
        &self,
        alias: &str,
        kind: &'static str,
        call: usize,
    ) -> Result<Alias, StructuralError> {
        match self.entries.get_key_value(alias) {
            Some((declared, declared_kind)) if *declared_kind == kind => Ok(declared.clone()),
            _ => Err(StructuralError::UnknownIdentifier {
                alias: alias.to_owned(),
                expected: kind,
                call,
            }),
        }
    }

    pub(crate) fn generate(&mut self, prefix: &str) -> Alias {
        self.generated += 1;
        Alias::generated(prefix, self.generated)
    }
}

#[cfg(test)]
mod tests {
    use super::AliasRegistry;
    use crate::error::StructuralError;
    use crate::model::Alias;

    #[test]
    fn declare_rejects_duplicates_with_owner_kind() {
        let mut registry = AliasRegistry::new();
        let alias = Alias::new("Shop").expect("alias");
        registry.declare(alias.clone(), "participant", 1).expect("declare");
        assert_eq!(
            registry.declare(alias.clone(), "participant", 2),
            Err(StructuralError::DuplicateIdentifier { alias, existing: "participant", call: 2 })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_checks_kind() {
        let mut registry = AliasRegistry::new();
        registry.declare(Alias::new("retry").expect("alias"), "label", 1).expect("declare");
        assert!(registry.require("retry", "label", 2).is_ok());
        assert_eq!(
            registry.require("retry", "state", 3),
            Err(StructuralError::UnknownIdentifier {
                alias: "retry".to_owned(),
                expected: "state",
                call: 3
            })
        );
    }

    #[test]
    fn generated_aliases_count_per_registry() {
        let mut first = AliasRegistry::new();
        let mut second = AliasRegistry::new();
        assert_eq!(first.generate("s").as_str(), "__s1");
        assert_eq!(first.generate("c").as_str(), "__c2");
        assert_eq!(second.generate("s").as_str(), "__s1");
    }
}
