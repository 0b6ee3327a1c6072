//! Closed value model shared by every sensor.
//!
//! A sensor's element type U and result type T each range over the same
//! four kinds; all 16 (T, U) combinations behave identically modulo the
//! type substitution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for the closed set of value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Double,
    Bool,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::Bool => "bool",
            ValueKind::Text => "text",
        };
        write!(f, "{s}")
    }
}

/// A single tagged value of one of the four kinds.
///
/// This is the type-erased form used on the collector boundary; inside a
/// sensor values stay strongly typed via [`MetricValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SampleValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    Text(String),
}

impl SampleValue {
    /// Kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            SampleValue::Int(_) => ValueKind::Int,
            SampleValue::Double(_) => ValueKind::Double,
            SampleValue::Bool(_) => ValueKind::Bool,
            SampleValue::Text(_) => ValueKind::Text,
        }
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Int(v) => write!(f, "{v}"),
            SampleValue::Double(v) => write!(f, "{v}"),
            SampleValue::Bool(v) => write!(f, "{v}"),
            SampleValue::Text(v) => write!(f, "{v}"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl Sealed for String {}
}

/// Marker trait for the closed set of element/result types.
///
/// Sealed: implemented for exactly `i64`, `f64`, `bool` and `String`.
pub trait MetricValue: sealed::Sealed + Clone + Send + Sync + 'static {
    /// Kind tag corresponding to `Self`.
    const KIND: ValueKind;

    /// Erase into the tagged representation.
    fn into_value(self) -> SampleValue;

    /// Recover from the tagged representation; `None` on a kind mismatch.
    fn from_value(value: SampleValue) -> Option<Self>;
}

impl MetricValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_value(self) -> SampleValue {
        SampleValue::Int(self)
    }

    fn from_value(value: SampleValue) -> Option<Self> {
        match value {
            SampleValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl MetricValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn into_value(self) -> SampleValue {
        SampleValue::Double(self)
    }

    fn from_value(value: SampleValue) -> Option<Self> {
        match value {
            SampleValue::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl MetricValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> SampleValue {
        SampleValue::Bool(self)
    }

    fn from_value(value: SampleValue) -> Option<Self> {
        match value {
            SampleValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl MetricValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> SampleValue {
        SampleValue::Text(self)
    }

    fn from_value(value: SampleValue) -> Option<Self> {
        match value {
            SampleValue::Text(v) => Some(v),
            _ => None,
        }
    }
}
