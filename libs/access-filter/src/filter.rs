use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Well-known record field names used by access filters.
pub mod fields {
    /// Tenant-ownership relationship of a record.
    pub const TENANT: &str = "tenant";

    /// Record identity (primary key).
    pub const ID: &str = "id";

    /// Publication status of records with a draft/published lifecycle.
    pub const STATUS: &str = "_status";
}

/// A value a filter compares a record field against.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Tenant or record id.
    Uuid(Uuid),
    /// Status and other string attributes.
    String(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::String(s) => Uuid::parse_str(s).ok(),
        }
    }

    /// Compare against a field value of a JSON record.
    ///
    /// Relationship fields may carry the related document instead of its id;
    /// in that case the document's `id` is compared.
    #[must_use]
    pub fn matches_json(&self, value: &Value) -> bool {
        if let Value::Object(doc) = value {
            return doc.get(fields::ID).is_some_and(|id| self.matches_json(id));
        }
        match self {
            Self::Uuid(u) => value.as_str().and_then(|s| Uuid::parse_str(s).ok()) == Some(*u),
            Self::String(s) => value.as_str() == Some(s.as_str()),
        }
    }
}

impl From<Uuid> for FieldValue {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<&Uuid> for FieldValue {
    fn from(u: &Uuid) -> Self {
        Self::Uuid(*u)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

/// A predicate on a single record field.
///
/// Serializes as `{"<field>": {"equals": v}}` or `{"<field>": {"in": [..]}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldFilter {
    /// `field = value`
    Equals { field: String, value: FieldValue },
    /// `field IN (values)`
    In {
        field: String,
        values: Vec<FieldValue>,
    },
}

impl FieldFilter {
    /// Create an equality filter.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a set membership filter from an iterator of convertible values.
    #[must_use]
    pub fn r#in<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The record field this filter constrains.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::In { field, .. } => field,
        }
    }

    /// The accepted values (a single-element slice for `Equals`).
    #[must_use]
    pub fn values(&self) -> &[FieldValue] {
        match self {
            Self::Equals { value, .. } => std::slice::from_ref(value),
            Self::In { values, .. } => values,
        }
    }

    /// Evaluate against a JSON record. A missing field never matches.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        record
            .get(self.field())
            .is_some_and(|actual| self.values().iter().any(|v| v.matches_json(actual)))
    }
}

struct Operand<'a>(&'a FieldFilter);

impl Serialize for Operand<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self.0 {
            FieldFilter::Equals { value, .. } => map.serialize_entry("equals", value)?,
            FieldFilter::In { values, .. } => map.serialize_entry("in", values)?,
        }
        map.end()
    }
}

impl Serialize for FieldFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field(), &Operand(self))?;
        map.end()
    }
}

/// A conjunction (AND) of field filters.
///
/// Always holds at least one filter; "no filtering" is expressed by
/// [`AccessScope::allow_all`](crate::AccessScope::allow_all), never by an
/// empty clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhereClause {
    filters: Vec<FieldFilter>,
}

impl WhereClause {
    #[must_use]
    pub fn new(filter: FieldFilter) -> Self {
        Self {
            filters: vec![filter],
        }
    }

    /// Combine with another clause; both must match.
    #[must_use]
    pub fn and(mut self, other: WhereClause) -> Self {
        self.filters.extend(other.filters);
        self
    }

    /// The filters in this clause (AND-ed together).
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    /// Evaluate against a JSON record.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Collect all values constraining `field`.
    #[must_use]
    pub fn values_for(&self, field: &str) -> Vec<&FieldValue> {
        self.filters
            .iter()
            .filter(|f| f.field() == field)
            .flat_map(FieldFilter::values)
            .collect()
    }

    /// Collect all UUID values constraining `field`, skipping non-UUID entries.
    #[must_use]
    pub fn uuid_values_for(&self, field: &str) -> Vec<Uuid> {
        self.values_for(field)
            .into_iter()
            .filter_map(FieldValue::as_uuid)
            .collect()
    }
}

impl From<FieldFilter> for WhereClause {
    fn from(filter: FieldFilter) -> Self {
        Self::new(filter)
    }
}

impl Serialize for WhereClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let [single] = self.filters.as_slice() {
            return single.serialize(serializer);
        }
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("and", &self.filters)?;
        map.end()
    }
}
