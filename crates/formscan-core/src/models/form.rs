//! Bound form data and the pipeline output record.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Value bound to one template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundValue {
    /// Text-like fields.
    Text(String),
    /// Checkbox fields.
    Flag(bool),
    /// Dynamic-list fields.
    List(Vec<String>),
}

impl BoundValue {
    /// The "unset" sentinel for text fields.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Whether the value counts as filled: non-empty text, `true`, or a non-empty list.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Flag(b) => *b,
            Self::List(items) => !items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{}", b),
            Self::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for BoundValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Detected attributes merged into a bound record without being declared fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuxiliaryAttribute {
    SelectedType,
    ProcedureCategory,
    SectorAdministration,
    TargetCategory,
}

impl AuxiliaryAttribute {
    /// Key under which the attribute is merged into the record.
    pub fn key(&self) -> &'static str {
        match self {
            Self::SelectedType => "selectedType",
            Self::ProcedureCategory => "procedureCategory",
            Self::SectorAdministration => "sectorAdministration",
            Self::TargetCategory => "targetCategory",
        }
    }
}

/// Values bound onto a template's fields, in template order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundFormData {
    fields: Vec<(String, BoundValue)>,
    auxiliary: BTreeMap<AuxiliaryAttribute, String>,
}

impl BoundFormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, keeping the original position if the field already exists.
    pub fn insert_field(&mut self, name: impl Into<String>, value: BoundValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&BoundValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text value of a field, if it is a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(BoundValue::as_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn set_auxiliary(&mut self, attribute: AuxiliaryAttribute, value: impl Into<String>) {
        self.auxiliary.insert(attribute, value.into());
    }

    pub fn auxiliary(&self, attribute: AuxiliaryAttribute) -> Option<&str> {
        self.auxiliary.get(&attribute).map(String::as_str)
    }

    pub fn auxiliaries(&self) -> impl Iterator<Item = (AuxiliaryAttribute, &str)> {
        self.auxiliary.iter().map(|(a, v)| (*a, v.as_str()))
    }
}

impl FromIterator<(String, BoundValue)> for BoundFormData {
    fn from_iter<T: IntoIterator<Item = (String, BoundValue)>>(iter: T) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.insert_field(name, value);
        }
        data
    }
}

/// Serialized as one flat record: declared fields first, then auxiliary
/// attributes that do not collide with a declared field name.
impl Serialize for BoundFormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra: Vec<_> = self
            .auxiliary
            .iter()
            .filter(|(a, _)| self.field(a.key()).is_none())
            .collect();

        let mut map = serializer.serialize_map(Some(self.fields.len() + extra.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        for (attribute, value) in extra {
            map.serialize_entry(attribute.key(), value)?;
        }
        map.end()
    }
}

/// Output handed to the consuming layer after one extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutput {
    /// Id of the template the fields were bound to.
    pub template_id: String,

    /// Bound fields plus auxiliary attributes.
    pub bound_fields: BoundFormData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_administration: Option<String>,

    pub detected_audience: String,

    pub filled_count: usize,

    pub total_count: usize,
}
