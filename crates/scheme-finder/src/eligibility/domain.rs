use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Typed value held by a profile field or a condition operand.
///
/// `Unknown` stands for an absent field and is distinct from `false` or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    List(Vec<FieldValue>),
    #[default]
    Unknown,
}

impl FieldValue {
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldValue::Unknown)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Boolean(_) => ValueKind::Boolean,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Unknown => ValueKind::Unknown,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value:?}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            FieldValue::Unknown => f.write_str("unknown"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => FieldValue::Unknown,
            Value::Bool(flag) => FieldValue::Boolean(flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => FieldValue::Integer(integer),
                None => number
                    .as_f64()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Unknown),
            },
            Value::String(text) => FieldValue::Text(text),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Integer(integer) => Value::Number(integer.into()),
            FieldValue::Float(float) => Number::from_f64(float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(text) => Value::String(text),
            FieldValue::Boolean(flag) => Value::Bool(flag),
            FieldValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            FieldValue::Unknown => Value::Null,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Integer,
    Float,
    Text,
    Boolean,
    List,
    Unknown,
}

static UNKNOWN: FieldValue = FieldValue::Unknown;

/// Sparse set of known attributes describing one applicant.
///
/// The field set is open: fields no condition refers to are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    fields: BTreeMap<String, FieldValue>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Looks up a field; absent fields read as [`FieldValue::Unknown`].
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&UNKNOWN)
    }

    pub fn is_known(&self, field: &str) -> bool {
        self.get(field).is_known()
    }

    /// Stores `value` under `field` unless that would replace a known value with
    /// `Unknown`. Returns whether the profile changed.
    pub fn record(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let field = field.into();
        let value = value.into();
        match self.fields.get(&field) {
            Some(existing) if existing.is_known() && !value.is_known() => false,
            Some(existing) if *existing == value => false,
            _ => {
                self.fields.insert(field, value);
                true
            }
        }
    }

    /// Region code carried by the `state` field, if known.
    pub fn region(&self) -> Option<&str> {
        self.get(KnownField::State.key())
            .as_text()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Checks that every recognised field holds a value of the expected kind.
    /// Unrecognised fields and unknown values always pass.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in &self.fields {
            let Some(known) = KnownField::from_key(field) else {
                continue;
            };
            if !known.accepts(value) {
                return Err(ProfileError::WrongKind {
                    field: field.clone(),
                    expected: known.expected_kind(),
                });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Profile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

/// Profile fields the current conditions and intake flow know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    Age,
    AnnualIncome,
    Occupation,
    LandOwned,
    LandSizeAcres,
    Disability,
    CasteCategory,
    HasBankAccount,
    HasAadhaar,
    HasPan,
    HasRationCard,
    RationCardType,
    Gender,
    State,
    District,
    StudentMarksPct,
    StudentCourse,
}

impl KnownField {
    pub const fn all() -> [Self; 17] {
        [
            Self::Age,
            Self::AnnualIncome,
            Self::Occupation,
            Self::LandOwned,
            Self::LandSizeAcres,
            Self::Disability,
            Self::CasteCategory,
            Self::HasBankAccount,
            Self::HasAadhaar,
            Self::HasPan,
            Self::HasRationCard,
            Self::RationCardType,
            Self::Gender,
            Self::State,
            Self::District,
            Self::StudentMarksPct,
            Self::StudentCourse,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::AnnualIncome => "annual_income",
            Self::Occupation => "occupation",
            Self::LandOwned => "land_owned",
            Self::LandSizeAcres => "land_size_acres",
            Self::Disability => "disability",
            Self::CasteCategory => "caste_category",
            Self::HasBankAccount => "has_bank_account",
            Self::HasAadhaar => "has_aadhaar",
            Self::HasPan => "has_pan",
            Self::HasRationCard => "has_ration_card",
            Self::RationCardType => "ration_card_type",
            Self::Gender => "gender",
            Self::State => "state",
            Self::District => "district",
            Self::StudentMarksPct => "student_marks_pct",
            Self::StudentCourse => "student_course",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.key() == key)
    }

    pub const fn expected_kind(self) -> &'static str {
        match self {
            Self::Age | Self::AnnualIncome => "integer",
            Self::LandSizeAcres | Self::StudentMarksPct => "number",
            Self::LandOwned
            | Self::Disability
            | Self::HasBankAccount
            | Self::HasAadhaar
            | Self::HasPan
            | Self::HasRationCard => "boolean",
            Self::Occupation
            | Self::CasteCategory
            | Self::RationCardType
            | Self::Gender
            | Self::State
            | Self::District
            | Self::StudentCourse => "string",
        }
    }

    fn accepts(self, value: &FieldValue) -> bool {
        let kind = value.kind();
        if kind == ValueKind::Unknown {
            return true;
        }
        match self.expected_kind() {
            "integer" => kind == ValueKind::Integer,
            "number" => matches!(kind, ValueKind::Integer | ValueKind::Float),
            "boolean" => kind == ValueKind::Boolean,
            _ => kind == ValueKind::Text,
        }
    }
}

/// Occupations offered by the intake flow; free text is still accepted.
pub const OCCUPATIONS: [&str; 6] = [
    "farmer",
    "student",
    "worker",
    "unemployed",
    "self-employed",
    "other",
];

/// Transport-side validation failure for a submitted profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("field '{field}' must hold a value of type {expected}")]
    WrongKind {
        field: String,
        expected: &'static str,
    },
}
