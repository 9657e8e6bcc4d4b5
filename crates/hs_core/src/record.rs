//! Loosely-typed key-value records.
//!
//! Block entity data arrives from disk or the network with whatever integer
//! width the writer chose, so readers ask for "an integer" or "a byte" and
//! let the record narrow whichever representation is actually stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single record value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Byte(i8),
    UByte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    /// Any numeric value as an `i64`. Floats truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v.into()),
            Value::UByte(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::UShort(v) => Some(v.into()),
            Value::Int(v) => Some(v.into()),
            Value::UInt(v) => Some(v.into()),
            Value::Long(v) => Some(v),
            Value::ULong(v) => i64::try_from(v).ok(),
            Value::Float(v) => truncate_float(v.into()),
            Value::Double(v) => truncate_float(v),
            Value::String(_) => None,
        }
    }

    /// Single-byte flag encoding. Wider signed integers are truncated to
    /// their low byte; unsigned wide and floating values are not flags.
    pub fn as_byte(&self) -> Option<u8> {
        match *self {
            Value::Byte(v) => Some(v as u8),
            Value::UByte(v) => Some(v),
            Value::Short(v) => Some(v as u8),
            Value::Int(v) => Some(v as u8),
            Value::Long(v) => Some(v as u8),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

fn truncate_float(v: f64) -> Option<i64> {
    if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    i8 => Byte,
    u8 => UByte,
    i16 => Short,
    u16 => UShort,
    i32 => Int,
    u32 => UInt,
    i64 => Long,
    u64 => ULong,
    f32 => Float,
    f64 => Double,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// Ordered mapping of field names to values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Numeric field as an `i64`, whatever width it was stored with.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Numeric field narrowed to an `i32`. Values outside the `i32` range are
    /// treated as absent.
    pub fn i32(&self, key: &str) -> Option<i32> {
        self.int(key).and_then(|v| i32::try_from(v).ok())
    }

    pub fn byte(&self, key: &str) -> Option<u8> {
        self.get(key).and_then(Value::as_byte)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
