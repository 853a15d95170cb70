use std::fmt;

use uuid::Uuid;

/// The value of a saga property as seen by the store.
///
/// Two comparisons are used on these values:
/// - uniqueness checks compare with `==`, so `Int(1)` and `Text("1")` differ;
/// - correlation lookups compare [`PropertyValue::render`] output, so they match.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
}

impl PropertyValue {
    /// String form used by correlation lookups. `Null` renders as `""`.
    pub fn render(&self) -> String {
        match self {
            PropertyValue::Null => String::new(),
            PropertyValue::Bool(value) => value.to_string(),
            PropertyValue::Int(value) => value.to_string(),
            PropertyValue::UInt(value) => value.to_string(),
            PropertyValue::Float(value) => value.to_string(),
            PropertyValue::Text(value) => value.clone(),
            PropertyValue::Uuid(value) => value.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.render()),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident => $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for PropertyValue {
                fn from(value: $source) -> Self {
                    PropertyValue::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int => i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt => u64: u8, u16, u32, u64, usize);

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(f64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<Uuid> for PropertyValue {
    fn from(value: Uuid) -> Self {
        PropertyValue::Uuid(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}
