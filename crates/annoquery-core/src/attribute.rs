//! Attribute paths: a property of an annotation, optionally aliased.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AnnotationType, ClauseElement, CompareOp, Operand, Value};

/// Property of an annotation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Property {
    Id,
    Label,
    Begin,
    End,
    Duration,
    Discourse,
    Custom(String),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Id => "id",
            Property::Label => "label",
            Property::Begin => "begin",
            Property::End => "end",
            Property::Duration => "duration",
            Property::Discourse => "discourse",
            Property::Custom(name) => name,
        }
    }

    /// Positional properties intrinsic to the token: begin, end, duration,
    /// discourse.
    pub fn is_anchor(&self) -> bool {
        matches!(
            self,
            Property::Begin | Property::End | Property::Duration | Property::Discourse
        )
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Property::Id)
    }

    /// Neither an anchor nor `id`.
    pub fn is_arbitrary(&self) -> bool {
        !self.is_anchor() && !self.is_id()
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        match name {
            "id" => Property::Id,
            "label" => Property::Label,
            "begin" => Property::Begin,
            "end" => Property::End,
            "duration" => Property::Duration,
            "discourse" => Property::Discourse,
            other => Property::Custom(other.to_string()),
        }
    }
}

impl From<String> for Property {
    fn from(name: String) -> Self {
        match Property::from(name.as_str()) {
            Property::Custom(_) => Property::Custom(name),
            known => known,
        }
    }
}

impl From<Property> for String {
    fn from(property: Property) -> Self {
        match property {
            Property::Custom(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property of an annotation, the unit of filtering and projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributePath {
    annotation: AnnotationType,
    property: Property,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

impl AttributePath {
    pub fn new(annotation: AnnotationType, property: impl Into<Property>) -> Self {
        Self {
            annotation,
            property: property.into(),
            alias: None,
        }
    }

    pub fn annotation(&self) -> &AnnotationType {
        &self.annotation
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Output column name for this path.
    pub fn column_name(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Same path pointing at another annotation.
    pub fn with_annotation(mut self, annotation: AnnotationType) -> Self {
        self.annotation = annotation;
        self
    }

    /// Alias, or hop segments and property joined with `_`.
    ///
    /// `phone.label` is `label`, `phone.following.label` is
    /// `following_label`, `phone.word.label` is `word_label`.
    pub fn output_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        let segments = self.annotation.segment_path();
        if segments.is_empty() {
            self.property.name().to_string()
        } else {
            format!("{segments}_{}", self.property)
        }
    }

    /// Whether both paths read the same property of the same annotation,
    /// ignoring aliases.
    pub fn same_target(&self, other: &AttributePath) -> bool {
        self.annotation == other.annotation && self.property == other.property
    }

    fn compare(&self, op: CompareOp, value: impl Into<Value>) -> ClauseElement {
        ClauseElement::Comparison {
            path: self.clone(),
            op,
            operand: Operand::Value(value.into()),
        }
    }

    pub fn equals(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Eq, value)
    }

    pub fn not_equals(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Ne, value)
    }

    pub fn less_than(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Lt, value)
    }

    pub fn less_or_equal(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Le, value)
    }

    pub fn greater_than(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Gt, value)
    }

    pub fn greater_or_equal(&self, value: impl Into<Value>) -> ClauseElement {
        self.compare(CompareOp::Ge, value)
    }

    pub fn in_set<I, V>(&self, values: I) -> ClauseElement
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.compare(CompareOp::In, Value::Array(values))
    }

    /// Compare against another path, usually on a different annotation.
    pub fn compare_path(&self, op: CompareOp, other: &AttributePath) -> ClauseElement {
        ClauseElement::Comparison {
            path: self.clone(),
            op,
            operand: Operand::Path(other.clone()),
        }
    }

    pub fn equals_path(&self, other: &AttributePath) -> ClauseElement {
        self.compare_path(CompareOp::Eq, other)
    }
}
