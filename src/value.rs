//! Typed, encoding-ready values
//!
//! A [`WireValue`] mirrors its declared IDL type exactly: integers keep their
//! declared width, struct fields keep their declared names and order, enums
//! carry the canonical variant name.

use crate::error::{PdakitError, PdakitResult};
use crate::schema::Primitive;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;

/// Integer at its declared width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireInt {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
}

impl WireInt {
    /// Narrow an exact integer to `primitive`'s width.
    ///
    /// Returns `None` when `primitive` is not an integer type or `value` is out of range.
    pub fn from_i128(value: i128, primitive: Primitive) -> Option<Self> {
        let int = match primitive {
            Primitive::U8 => Self::U8(u8::try_from(value).ok()?),
            Primitive::I8 => Self::I8(i8::try_from(value).ok()?),
            Primitive::U16 => Self::U16(u16::try_from(value).ok()?),
            Primitive::I16 => Self::I16(i16::try_from(value).ok()?),
            Primitive::U32 => Self::U32(u32::try_from(value).ok()?),
            Primitive::I32 => Self::I32(i32::try_from(value).ok()?),
            Primitive::U64 => Self::U64(u64::try_from(value).ok()?),
            Primitive::I64 => Self::I64(i64::try_from(value).ok()?),
            Primitive::U128 => Self::U128(u128::try_from(value).ok()?),
            Primitive::I128 => Self::I128(value),
            _ => return None,
        };
        Some(int)
    }

    /// Little-endian bytes at the declared width
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::U8(v) => v.to_le_bytes().to_vec(),
            Self::I8(v) => v.to_le_bytes().to_vec(),
            Self::U16(v) => v.to_le_bytes().to_vec(),
            Self::I16(v) => v.to_le_bytes().to_vec(),
            Self::U32(v) => v.to_le_bytes().to_vec(),
            Self::I32(v) => v.to_le_bytes().to_vec(),
            Self::U64(v) => v.to_le_bytes().to_vec(),
            Self::I64(v) => v.to_le_bytes().to_vec(),
            Self::U128(v) => v.to_le_bytes().to_vec(),
            Self::I128(v) => v.to_le_bytes().to_vec(),
        }
    }
}

impl std::fmt::Display for WireInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U128(v) => write!(f, "{}", v),
            Self::I128(v) => write!(f, "{}", v),
        }
    }
}

/// Payload of a selected enum variant
#[derive(Debug, Clone, PartialEq)]
pub enum EnumPayload {
    /// Zero-field variant
    Unit,
    Tuple(Vec<WireValue>),
    Named(Vec<(String, WireValue)>),
}

/// A fully typed value, ready for instruction encoding
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Bool(bool),
    Int(WireInt),
    Float(f64),
    String(String),
    Pubkey(Pubkey),
    Bytes(Vec<u8>),
    Vec(Vec<WireValue>),
    Array(Vec<WireValue>),
    Option(Option<Box<WireValue>>),
    /// Fields in declaration order, names exactly as declared
    Struct(Vec<(String, WireValue)>),
    Enum {
        /// Canonical (lower camel) variant name
        variant: String,
        payload: EnumPayload,
    },
}

impl WireValue {
    pub fn none() -> Self {
        WireValue::Option(None)
    }

    pub fn some(inner: WireValue) -> Self {
        WireValue::Option(Some(Box::new(inner)))
    }

    /// Struct field by declared name
    pub fn field(&self, name: &str) -> Option<&WireValue> {
        match self {
            WireValue::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render as JSON for the signing layer.
    ///
    /// 64- and 128-bit integers render as decimal strings so no consumer
    /// reads them through a lossy float.
    pub fn to_json(&self) -> PdakitResult<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| PdakitError::mismatch(format!("value has no JSON form: {}", e)))
    }
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WireValue::Bool(b) => serializer.serialize_bool(*b),
            WireValue::Int(int) => match int {
                WireInt::U8(v) => serializer.serialize_u8(*v),
                WireInt::I8(v) => serializer.serialize_i8(*v),
                WireInt::U16(v) => serializer.serialize_u16(*v),
                WireInt::I16(v) => serializer.serialize_i16(*v),
                WireInt::U32(v) => serializer.serialize_u32(*v),
                WireInt::I32(v) => serializer.serialize_i32(*v),
                wide => serializer.serialize_str(&wide.to_string()),
            },
            WireValue::Float(f) => serializer.serialize_f64(*f),
            WireValue::String(s) => serializer.serialize_str(s),
            WireValue::Pubkey(key) => serializer.serialize_str(&key.to_string()),
            WireValue::Bytes(bytes) => bytes.serialize(serializer),
            WireValue::Vec(items) | WireValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            WireValue::Option(None) => serializer.serialize_none(),
            WireValue::Option(Some(inner)) => inner.serialize(serializer),
            WireValue::Struct(fields) => serialize_fields(fields, serializer),
            WireValue::Enum { variant, payload } => {
                let mut map = serializer.serialize_map(Some(1))?;
                match payload {
                    EnumPayload::Unit => {
                        map.serialize_entry(variant, &serde_json::Map::new())?;
                    }
                    EnumPayload::Tuple(items) => {
                        let indexed: Vec<(String, &WireValue)> = items
                            .iter()
                            .enumerate()
                            .map(|(i, v)| (i.to_string(), v))
                            .collect();
                        map.serialize_entry(variant, &IndexedFields(&indexed))?;
                    }
                    EnumPayload::Named(fields) => {
                        map.serialize_entry(variant, &NamedFields(fields))?;
                    }
                }
                map.end()
            }
        }
    }
}

fn serialize_fields<S: Serializer>(
    fields: &[(String, WireValue)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

struct NamedFields<'a>(&'a [(String, WireValue)]);

impl Serialize for NamedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.0, serializer)
    }
}

// Tuple variant payloads render as `{"0": .., "1": ..}`, the shape Anchor clients expect.
struct IndexedFields<'a>(&'a [(String, &'a WireValue)]);

impl Serialize for IndexedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
