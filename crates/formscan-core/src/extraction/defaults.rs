//! Defaulting pass applied once after binding.

use tracing::debug;

use crate::models::form::{AuxiliaryAttribute, BoundFormData, BoundValue};
use crate::models::record::DocumentDomain;

/// Value a default rule supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// First known type of the domain.
    DomainType,
    Constant(&'static str),
}

impl DefaultValue {
    pub fn resolve(&self, domain: DocumentDomain) -> &'static str {
        match self {
            Self::DomainType => domain.default_type(),
            Self::Constant(value) => value,
        }
    }
}

/// `(domain, attribute, default)`; a `None` domain applies to every domain.
pub const DEFAULT_RULES: &[(Option<DocumentDomain>, AuxiliaryAttribute, DefaultValue)] = &[
    (None, AuxiliaryAttribute::SelectedType, DefaultValue::DomainType),
    (
        Some(DocumentDomain::Procedure),
        AuxiliaryAttribute::SectorAdministration,
        DefaultValue::Constant("Ministère du Commerce"),
    ),
];

/// Fill unset auxiliary attributes, and the blank text field a template
/// declares under the same key. A blank declared field takes the attribute's
/// known value first. Non-empty values are never replaced.
/// Returns the number of attributes that were defaulted.
pub fn apply_defaults(bound: &mut BoundFormData, domain: DocumentDomain) -> usize {
    let mut applied = 0;

    for (scope, attribute, default) in DEFAULT_RULES {
        if scope.is_some_and(|d| d != domain) {
            continue;
        }

        let key = attribute.key();
        let blank_field = matches!(
            bound.field(key),
            Some(BoundValue::Text(s)) if s.trim().is_empty()
        );
        let known = bound
            .auxiliary(*attribute)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        if let Some(value) = known {
            if blank_field {
                bound.insert_field(key, BoundValue::from(value));
            }
            continue;
        }

        let value = default.resolve(domain);
        debug!("Defaulting {} to {}", key, value);
        if blank_field {
            bound.insert_field(key, BoundValue::from(value));
        }
        bound.set_auxiliary(*attribute, value);
        applied += 1;
    }

    applied
}
