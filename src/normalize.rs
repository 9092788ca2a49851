//! Coerce loosely-typed input into IDL-typed values
//!
//! Input arrives as JSON: form fields hand over strings, structured editors
//! hand over nested objects, and either may hold JSON text for a list or
//! struct. [`to_wire_value`] walks the declared type and produces a
//! [`WireValue`]; [`to_seed_bytes`] encodes primitive leaves for PDA seeds.
//!
//! Every recursive frame prefixes its own segment onto an error raised
//! beneath it, so a failure reads like `config.items[2].amount`.

use crate::error::{PdakitError, PdakitResult};
use crate::idl::{IdlEnumFields, IdlEnumVariant, IdlField, IdlInstruction, IdlType, IdlTypeDefTy};
use crate::naming;
use crate::schema::{classify, display_name, Primitive, SchemaContext, TypeShape};
use crate::value::{EnumPayload, WireInt, WireValue};
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use std::borrow::Cow;
use std::str::FromStr;

/// Largest integer a JSON float carries exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert `value` to the wire form of `ty`.
pub fn to_wire_value(value: &Value, ty: &IdlType, ctx: &SchemaContext) -> PdakitResult<WireValue> {
    match classify(ty) {
        TypeShape::Primitive(primitive) => convert_primitive(value, primitive),
        TypeShape::Vector(inner) => {
            let items = as_list(value)?;
            convert_items(&items, inner, ctx).map(WireValue::Vec)
        }
        TypeShape::Optional(inner) => {
            if is_absent(value) {
                Ok(WireValue::none())
            } else {
                to_wire_value(value, inner, ctx).map(WireValue::some)
            }
        }
        TypeShape::FixedArray(inner, size) => {
            let items = as_list(value)?;
            if items.len() != size {
                return Err(PdakitError::mismatch(format!(
                    "expected array of {} elements, got {}",
                    size,
                    items.len()
                )));
            }
            convert_items(&items, inner, ctx).map(WireValue::Array)
        }
        TypeShape::Defined(name) => {
            let def = ctx.resolve(name).ok_or_else(|| match ctx.lookup(name) {
                Some(_) => PdakitError::Schema(format!("type alias '{}' never resolves", name)),
                None => PdakitError::Schema(format!("type '{}' is not defined in the IDL", name)),
            })?;
            match &def.ty {
                IdlTypeDefTy::Struct { fields } => {
                    let object = as_object(value)?;
                    convert_fields(fields, &object, ctx).map(WireValue::Struct)
                }
                IdlTypeDefTy::Enum { variants } => convert_enum(value, &def.name, variants, ctx),
                IdlTypeDefTy::Type { alias } => to_wire_value(value, alias, ctx),
            }
        }
        TypeShape::Unknown => Err(PdakitError::Schema(format!(
            "unsupported IDL type {}",
            display_name(ty)
        ))),
    }
}

/// Convert every declared argument of `instruction` from `values`, in declaration order.
///
/// Missing required arguments are reported together in one error.
pub fn convert_args(
    instruction: &IdlInstruction,
    values: &Map<String, Value>,
    ctx: &SchemaContext,
) -> PdakitResult<Vec<(String, WireValue)>> {
    convert_fields(&instruction.args, values, ctx)
}

/// Encode a primitive leaf as seed bytes.
///
/// Integers are little-endian at their declared width (128-bit is not
/// supported), strings are UTF-8, addresses are their raw 32 bytes.
pub fn to_seed_bytes(value: &Value, ty: &IdlType) -> PdakitResult<Vec<u8>> {
    let unsupported = || PdakitError::mismatch(format!("unsupported seed type {}", display_name(ty)));

    let TypeShape::Primitive(primitive) = classify(ty) else {
        return Err(unsupported());
    };

    match primitive {
        Primitive::U128 | Primitive::I128 => Err(unsupported()),
        Primitive::String => Ok(convert_string(value)?.into_bytes()),
        Primitive::Pubkey => Ok(convert_pubkey(value)?.to_bytes().to_vec()),
        int if int.int_width().is_some() => Ok(convert_int(value, int)?.to_le_bytes()),
        _ => Err(unsupported()),
    }
}

fn convert_items(items: &[Value], inner: &IdlType, ctx: &SchemaContext) -> PdakitResult<Vec<WireValue>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| to_wire_value(item, inner, ctx).map_err(|e| e.at(&format!("[{}]", i))))
        .collect()
}

fn is_optional(ty: &IdlType) -> bool {
    matches!(classify(ty), TypeShape::Optional(_))
}

/// null and the empty string both mean "not supplied"
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn convert_fields(
    fields: &[IdlField],
    object: &Map<String, Value>,
    ctx: &SchemaContext,
) -> PdakitResult<Vec<(String, WireValue)>> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|field| !is_optional(&field.ty))
        .filter(|field| naming::get_field(object, &field.name).map_or(true, Value::is_null))
        .map(|field| field.name.as_str())
        .collect();

    if !missing.is_empty() {
        let noun = if missing.len() == 1 { "field" } else { "fields" };
        return Err(PdakitError::missing(
            "",
            format!("missing required {}: {}", noun, missing.join(", ")),
        ));
    }

    fields
        .iter()
        .map(|field| {
            let value = match naming::get_field(object, &field.name) {
                Some(value) => to_wire_value(value, &field.ty, ctx),
                None => Ok(WireValue::none()),
            };
            value
                .map(|v| (field.name.clone(), v))
                .map_err(|e| e.at(&field.name))
        })
        .collect()
}

fn convert_enum(
    value: &Value,
    type_name: &str,
    variants: &[IdlEnumVariant],
    ctx: &SchemaContext,
) -> PdakitResult<WireValue> {
    let parsed;
    let value = match value {
        Value::String(text) if text.trim_start().starts_with('{') => {
            parsed = parse_json_text(text)?;
            &parsed
        }
        other => other,
    };

    let (selector, payload) = match value {
        Value::String(name) => (name.as_str(), None),
        Value::Object(map) if map.len() == 1 => {
            let (name, payload) = map.iter().next().ok_or_else(|| {
                PdakitError::mismatch(format!("expected a variant of {}", type_name))
            })?;
            (name.as_str(), Some(payload))
        }
        Value::Object(map) => {
            return Err(PdakitError::mismatch(format!(
                "expected exactly one variant key for enum {}, got {}",
                type_name,
                map.len()
            )))
        }
        other => {
            return Err(PdakitError::mismatch(format!(
                "expected a variant of enum {}, got {}",
                type_name,
                describe(other)
            )))
        }
    };

    let variant = naming::find_by_name(variants, selector, |v| v.name.as_str()).ok_or_else(|| {
        let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        PdakitError::mismatch(format!(
            "unknown variant '{}' for enum {}; expected one of: {}",
            selector,
            type_name,
            names.join(", ")
        ))
    })?;

    let payload = convert_variant_payload(variant, payload, ctx).map_err(|e| e.at(&variant.name))?;

    Ok(WireValue::Enum {
        variant: naming::canonicalize(&variant.name),
        payload,
    })
}

fn convert_variant_payload(
    variant: &IdlEnumVariant,
    payload: Option<&Value>,
    ctx: &SchemaContext,
) -> PdakitResult<EnumPayload> {
    match &variant.fields {
        None => Ok(EnumPayload::Unit),
        Some(IdlEnumFields::Named(fields)) if fields.is_empty() => Ok(EnumPayload::Unit),
        Some(IdlEnumFields::Tuple(types)) if types.is_empty() => Ok(EnumPayload::Unit),
        Some(IdlEnumFields::Named(fields)) => {
            let empty = Value::Object(Map::new());
            let object = as_object(payload.unwrap_or(&empty))?;
            convert_fields(fields, &object, ctx).map(EnumPayload::Named)
        }
        Some(IdlEnumFields::Tuple(types)) => {
            let payload = payload.ok_or_else(|| {
                PdakitError::missing("", format!("variant takes {} positional field(s)", types.len()))
            })?;
            let items = tuple_items(payload, types.len())?;
            if items.len() != types.len() {
                return Err(PdakitError::mismatch(format!(
                    "expected {} positional fields, got {}",
                    types.len(),
                    items.len()
                )));
            }
            items
                .iter()
                .zip(types)
                .enumerate()
                .map(|(i, (item, ty))| to_wire_value(item, ty, ctx).map_err(|e| e.at(&format!("[{}]", i))))
                .collect::<PdakitResult<Vec<_>>>()
                .map(EnumPayload::Tuple)
        }
    }
}

/// Positional payload as a list, an index-keyed object, or a lone value for one-field tuples
fn tuple_items(payload: &Value, arity: usize) -> PdakitResult<Vec<Value>> {
    match payload {
        Value::Object(map) => (0..map.len())
            .map(|i| {
                map.get(&i.to_string()).cloned().ok_or_else(|| {
                    PdakitError::mismatch(format!("positional payload is missing index {}", i))
                })
            })
            .collect(),
        Value::Array(_) => Ok(as_list(payload)?.into_owned()),
        Value::String(text) if text.trim_start().starts_with('[') => Ok(as_list(payload)?.into_owned()),
        single if arity == 1 => Ok(vec![single.clone()]),
        other => Err(PdakitError::mismatch(format!(
            "expected positional fields, got {}",
            describe(other)
        ))),
    }
}

fn as_list(value: &Value) -> PdakitResult<Cow<'_, [Value]>> {
    match value {
        Value::Array(items) => Ok(Cow::Borrowed(items.as_slice())),
        Value::String(text) => match parse_json_text(text)? {
            Value::Array(items) => Ok(Cow::Owned(items)),
            other => Err(PdakitError::mismatch(format!(
                "expected a list, got JSON {}",
                describe(&other)
            ))),
        },
        other => Err(PdakitError::mismatch(format!(
            "expected a list, got {}",
            describe(other)
        ))),
    }
}

pub(crate) fn as_object(value: &Value) -> PdakitResult<Cow<'_, Map<String, Value>>> {
    match value {
        Value::Object(map) => Ok(Cow::Borrowed(map)),
        Value::String(text) => match parse_json_text(text)? {
            Value::Object(map) => Ok(Cow::Owned(map)),
            other => Err(PdakitError::mismatch(format!(
                "expected an object, got JSON {}",
                describe(&other)
            ))),
        },
        other => Err(PdakitError::mismatch(format!(
            "expected an object, got {}",
            describe(other)
        ))),
    }
}

fn parse_json_text(text: &str) -> PdakitResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| PdakitError::mismatch(format!("invalid JSON text {}: {}", quote(text), e)))
}

fn convert_primitive(value: &Value, primitive: Primitive) -> PdakitResult<WireValue> {
    match primitive {
        Primitive::Bool => Ok(WireValue::Bool(convert_bool(value))),
        Primitive::F32 | Primitive::F64 => convert_float(value, primitive).map(WireValue::Float),
        Primitive::String => convert_string(value).map(WireValue::String),
        Primitive::Pubkey => convert_pubkey(value).map(WireValue::Pubkey),
        Primitive::Bytes => convert_bytes(value).map(WireValue::Bytes),
        int => convert_int(value, int).map(WireValue::Int),
    }
}

fn convert_bool(value: &Value) -> bool {
    match value {
        Value::String(s) if s == "true" => true,
        Value::String(s) if s == "false" => false,
        other => is_truthy(other),
    }
}

/// Loose truthiness: null, false, zero and "" are false
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn convert_string(value: &Value) -> PdakitResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(PdakitError::mismatch(format!(
            "expected a string, got {}",
            describe(other)
        ))),
    }
}

fn convert_pubkey(value: &Value) -> PdakitResult<Pubkey> {
    match value {
        Value::String(text) => Pubkey::from_str(text.trim()).map_err(|e| {
            PdakitError::mismatch(format!("invalid address {}: {}", quote(text), e))
        }),
        Value::Array(_) => {
            let bytes = convert_bytes(value)?;
            let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                PdakitError::mismatch(format!("address must be 32 bytes, got {}", bytes.len()))
            })?;
            Ok(Pubkey::new_from_array(array))
        }
        other => Err(PdakitError::mismatch(format!(
            "expected an address, got {}",
            describe(other)
        ))),
    }
}

fn convert_bytes(value: &Value) -> PdakitResult<Vec<u8>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| {
                        PdakitError::mismatch(format!("expected a byte (0-255), got {}", describe(item)))
                            .at(&format!("[{}]", i))
                    })
            })
            .collect(),
        // Node's Buffer.toJSON() shape
        Value::Object(map) if map.get("data").is_some_and(Value::is_array) => {
            convert_bytes(&map["data"])
        }
        Value::String(text) => {
            if text.trim_start().starts_with('[') {
                if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(text) {
                    return convert_bytes(&parsed);
                }
            }
            Ok(text.as_bytes().to_vec())
        }
        other => Err(PdakitError::mismatch(format!(
            "expected bytes, got {}",
            describe(other)
        ))),
    }
}

fn convert_float(value: &Value, primitive: Primitive) -> PdakitResult<f64> {
    let float = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
    .ok_or_else(|| {
        PdakitError::mismatch(format!("expected a finite {}, got {}", primitive, describe(value)))
    })?;

    if primitive == Primitive::F32 && float.abs() > f64::from(f32::MAX) {
        return Err(PdakitError::mismatch(format!("{} is out of range for f32", float)));
    }
    Ok(float)
}

fn convert_int(value: &Value, primitive: Primitive) -> PdakitResult<WireInt> {
    let exact = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ExactInt::from(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                ExactInt::from(i128::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(PdakitError::mismatch(format!("expected an integer, got {}", n)));
                }
                if f.abs() > MAX_SAFE_INTEGER {
                    return Err(PdakitError::mismatch(format!(
                        "{} is beyond the exact float range; pass it as a string",
                        n
                    )));
                }
                ExactInt::from(f as i128)
            }
        }
        Value::String(text) => parse_integer_text(text).map_err(PdakitError::mismatch)?,
        other => {
            return Err(PdakitError::mismatch(format!(
                "expected an integer, got {}",
                describe(other)
            )))
        }
    };

    exact.narrow(primitive).ok_or_else(|| {
        let (min, max) = int_bounds(primitive);
        PdakitError::mismatch(format!(
            "{} is out of range for {} [{}, {}]",
            exact, primitive, min, max
        ))
    })
}

fn int_bounds(primitive: Primitive) -> (String, String) {
    match primitive {
        Primitive::U8 => (u8::MIN.to_string(), u8::MAX.to_string()),
        Primitive::I8 => (i8::MIN.to_string(), i8::MAX.to_string()),
        Primitive::U16 => (u16::MIN.to_string(), u16::MAX.to_string()),
        Primitive::I16 => (i16::MIN.to_string(), i16::MAX.to_string()),
        Primitive::U32 => (u32::MIN.to_string(), u32::MAX.to_string()),
        Primitive::I32 => (i32::MIN.to_string(), i32::MAX.to_string()),
        Primitive::U64 => (u64::MIN.to_string(), u64::MAX.to_string()),
        Primitive::I64 => (i64::MIN.to_string(), i64::MAX.to_string()),
        Primitive::U128 => (u128::MIN.to_string(), u128::MAX.to_string()),
        _ => (i128::MIN.to_string(), i128::MAX.to_string()),
    }
}

/// Sign-magnitude integer wide enough for both u128 and i128
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExactInt {
    negative: bool,
    magnitude: u128,
}

impl From<i128> for ExactInt {
    fn from(value: i128) -> Self {
        Self {
            negative: value < 0,
            magnitude: value.unsigned_abs(),
        }
    }
}

impl ExactInt {
    fn narrow(self, primitive: Primitive) -> Option<WireInt> {
        if primitive == Primitive::U128 {
            return match (self.negative && self.magnitude != 0, self.magnitude) {
                (true, _) => None,
                (false, m) => Some(WireInt::U128(m)),
            };
        }

        let signed = if self.negative {
            if self.magnitude == i128::MIN.unsigned_abs() {
                i128::MIN
            } else {
                -i128::try_from(self.magnitude).ok()?
            }
        } else {
            i128::try_from(self.magnitude).ok()?
        };
        WireInt::from_i128(signed, primitive)
    }
}

impl std::fmt::Display for ExactInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative && self.magnitude != 0 {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Parse decimal integer text, allowing an exponent (`1e3`, `1.5e2`) when the
/// result is integral.
///
/// Half-typed input (``, `-`, `1e`, `1e+`) is rejected with its own message
/// since form fields pass through those states while the user types.
fn parse_integer_text(text: &str) -> Result<ExactInt, String> {
    let t = text.trim();
    if t.is_empty() {
        return Err("empty string is not an integer".to_string());
    }
    if t == "-" || t == "+" {
        return Err(format!("incomplete number {}", quote(t)));
    }

    let (negative, unsigned) = match t.as_bytes()[0] {
        b'-' => (true, &t[1..]),
        b'+' => (false, &t[1..]),
        _ => (false, t),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => {
            let exp_text = &unsigned[pos + 1..];
            let digits = exp_text.trim_start_matches(['+', '-']);
            if digits.is_empty() {
                return Err(format!("incomplete exponent in {}", quote(t)));
            }
            let exp = exp_text
                .parse::<i32>()
                .map_err(|_| format!("invalid exponent in {}", quote(t)))?;
            (&unsigned[..pos], exp)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(format!("{} is not a valid integer", quote(t)));
    }

    let mut digits = format!("{}{}", int_part, frac_part);
    if digits.bytes().all(|b| b == b'0') {
        return Ok(ExactInt {
            negative,
            magnitude: 0,
        });
    }

    let scale = i64::from(exponent) - frac_part.len() as i64;
    if scale >= 0 {
        if scale > 40 {
            return Err(format!("{} is too large", quote(t)));
        }
        digits.push_str(&"0".repeat(scale as usize));
    } else {
        let cut = digits.len().saturating_sub(scale.unsigned_abs() as usize);
        if digits[cut..].bytes().any(|b| b != b'0') {
            return Err(format!("{} is not an integer", quote(t)));
        }
        digits.truncate(cut);
    }

    let digits = digits.trim_start_matches('0');
    let magnitude = if digits.is_empty() {
        0
    } else {
        digits
            .parse::<u128>()
            .map_err(|_| format!("{} is too large", quote(t)))?
    };

    Ok(ExactInt { negative, magnitude })
}

fn quote(text: &str) -> String {
    const LIMIT: usize = 40;
    if text.chars().count() > LIMIT {
        let head: String = text.chars().take(LIMIT).collect();
        format!("'{}...'", head)
    } else {
        format!("'{}'", text)
    }
}

/// Short description of a JSON value for error messages
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {}", quote(s)),
        Value::Array(items) => format!("list of {}", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idl::Idl;
    use serde_json::json;

    fn ctx() -> SchemaContext {
        let idl: Idl = serde_json::from_value(json!({
            "address": "11111111111111111111111111111111",
            "metadata": { "name": "t", "version": "0.1.0", "spec": "0.1.0" },
            "instructions": [{
                "name": "init",
                "accounts": [],
                "args": [
                    { "name": "amount", "type": "u64" },
                    { "name": "label", "type": "string" },
                    { "name": "memo", "type": { "option": "string" } }
                ]
            }],
            "types": [
                { "name": "Config", "type": { "kind": "struct", "fields": [
                    { "name": "owner", "type": "pubkey" },
                    { "name": "bump", "type": "u8" },
                    { "name": "counter", "type": "u64" },
                    { "name": "note", "type": { "option": "string" } }
                ] } },
                { "name": "Role", "type": { "kind": "enum", "variants": [
                    { "name": "Admin" },
                    { "name": "SuperUser" },
                    { "name": "Limited", "fields": [{ "name": "max_amount", "type": "u64" }] },
                    { "name": "Pair", "fields": ["u8", "bool"] }
                ] } },
                { "name": "Wrapper", "type": { "kind": "struct", "fields": [
                    { "name": "items", "type": { "vec": { "defined": { "name": "Config" } } } }
                ] } },
                { "name": "Lamports", "type": { "kind": "type", "alias": "u64" } },
                { "name": "Loop", "type": { "kind": "type", "alias": { "defined": { "name": "Loop" } } } }
            ]
        }))
        .unwrap();
        SchemaContext::new(idl)
    }

    fn ty(value: Value) -> IdlType {
        serde_json::from_value(value).unwrap()
    }

    const OWNER: &str = "So11111111111111111111111111111111111111112";

    #[test]
    fn test_integer_inputs() {
        let c = ctx();
        let u64_ty = IdlType::primitive("u64");
        let expected = WireValue::Int(WireInt::U64(1000));
        assert_eq!(to_wire_value(&json!(1000), &u64_ty, &c).unwrap(), expected);
        assert_eq!(to_wire_value(&json!("1000"), &u64_ty, &c).unwrap(), expected);
        assert_eq!(to_wire_value(&json!("1e3"), &u64_ty, &c).unwrap(), expected);
        assert_eq!(to_wire_value(&json!(" 1.5e3 "), &u64_ty, &c).unwrap(), WireValue::Int(WireInt::U64(1500)));
        assert_eq!(
            to_wire_value(&json!("18446744073709551615"), &u64_ty, &c).unwrap(),
            WireValue::Int(WireInt::U64(u64::MAX))
        );
        assert_eq!(
            to_wire_value(&json!("340282366920938463463374607431768211455"), &IdlType::primitive("u128"), &c).unwrap(),
            WireValue::Int(WireInt::U128(u128::MAX))
        );
        assert_eq!(
            to_wire_value(&json!("-170141183460469231731687303715884105728"), &IdlType::primitive("i128"), &c).unwrap(),
            WireValue::Int(WireInt::I128(i128::MIN))
        );
    }

    #[test]
    fn test_integer_transient_text_rejected() {
        let c = ctx();
        let ty = IdlType::primitive("i32");
        for text in ["", "-", "+", "1e", "1e+", "2E-"] {
            let err = to_wire_value(&json!(text), &ty, &c).unwrap_err();
            assert!(matches!(err, PdakitError::TypeMismatch { .. }), "{}", text);
        }
        let err = to_wire_value(&json!("1e"), &ty, &c).unwrap_err();
        assert!(err.to_string().contains("incomplete exponent"));
        let err = to_wire_value(&json!("1.5"), &ty, &c).unwrap_err();
        assert!(err.to_string().contains("not an integer"));
        assert!(to_wire_value(&json!(1.5), &ty, &c).is_err());
        assert!(to_wire_value(&json!(1e300), &ty, &c).is_err());
    }

    #[test]
    fn test_integer_ranges() {
        let c = ctx();
        let u8_ty = IdlType::primitive("u8");
        assert_eq!(to_wire_value(&json!(255), &u8_ty, &c).unwrap(), WireValue::Int(WireInt::U8(255)));
        let err = to_wire_value(&json!(256), &u8_ty, &c).unwrap_err();
        assert!(err.to_string().contains("[0, 255]"));
        assert!(to_wire_value(&json!(-1), &u8_ty, &c).is_err());
        assert!(to_wire_value(&json!("-1"), &IdlType::primitive("u128"), &c).is_err());
        assert_eq!(
            to_wire_value(&json!("-0"), &IdlType::primitive("u128"), &c).unwrap(),
            WireValue::Int(WireInt::U128(0))
        );
    }

    #[test]
    fn test_bool_and_string() {
        let c = ctx();
        let b = IdlType::primitive("bool");
        assert_eq!(to_wire_value(&json!("true"), &b, &c).unwrap(), WireValue::Bool(true));
        assert_eq!(to_wire_value(&json!("false"), &b, &c).unwrap(), WireValue::Bool(false));
        // case-sensitive: "False" is a non-empty string, so truthy
        assert_eq!(to_wire_value(&json!("False"), &b, &c).unwrap(), WireValue::Bool(true));
        assert_eq!(to_wire_value(&json!(0), &b, &c).unwrap(), WireValue::Bool(false));
        assert_eq!(to_wire_value(&json!(null), &b, &c).unwrap(), WireValue::Bool(false));

        let s = IdlType::primitive("string");
        assert_eq!(to_wire_value(&json!("hi"), &s, &c).unwrap(), WireValue::String("hi".into()));
    }

    #[test]
    fn test_pubkey_and_bytes() {
        let c = ctx();
        let key = Pubkey::from_str(OWNER).unwrap();
        let pk = IdlType::primitive("pubkey");
        assert_eq!(to_wire_value(&json!(OWNER), &pk, &c).unwrap(), WireValue::Pubkey(key));
        assert_eq!(
            to_wire_value(&json!(key.to_bytes().to_vec()), &pk, &c).unwrap(),
            WireValue::Pubkey(key)
        );
        assert!(to_wire_value(&json!("not-a-key"), &pk, &c).is_err());

        let bytes = IdlType::primitive("bytes");
        assert_eq!(to_wire_value(&json!([1, 2]), &bytes, &c).unwrap(), WireValue::Bytes(vec![1, 2]));
        assert_eq!(to_wire_value(&json!("[1, 2]"), &bytes, &c).unwrap(), WireValue::Bytes(vec![1, 2]));
        assert_eq!(to_wire_value(&json!("ab"), &bytes, &c).unwrap(), WireValue::Bytes(b"ab".to_vec()));
        assert_eq!(
            to_wire_value(&json!({ "type": "Buffer", "data": [7] }), &bytes, &c).unwrap(),
            WireValue::Bytes(vec![7])
        );
        let err = to_wire_value(&json!([1, 300]), &bytes, &c).unwrap_err();
        assert_eq!(err.path(), Some("[1]"));
    }

    #[test]
    fn test_vector_text_matches_native() {
        let c = ctx();
        let vec_ty = ty(json!({ "vec": "u16" }));
        let native = to_wire_value(&json!([1, 2, 3]), &vec_ty, &c).unwrap();
        let text = to_wire_value(&json!("[1, 2, 3]"), &vec_ty, &c).unwrap();
        assert_eq!(native, text);
        let WireValue::Vec(items) = native else { panic!("expected vec") };
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], WireValue::Int(WireInt::U16(3)));

        let err = to_wire_value(&json!([1, "x"]), &vec_ty, &c).unwrap_err();
        assert_eq!(err.path(), Some("[1]"));
    }

    #[test]
    fn test_fixed_array_length() {
        let c = ctx();
        let arr = ty(json!({ "array": ["u8", 3] }));
        assert!(to_wire_value(&json!([1, 2, 3]), &arr, &c).is_ok());
        let err = to_wire_value(&json!([1, 2]), &arr, &c).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("3") && msg.contains("got 2"), "{}", msg);
    }

    #[test]
    fn test_optional() {
        let c = ctx();
        let opt = ty(json!({ "option": "u32" }));
        assert_eq!(to_wire_value(&json!(null), &opt, &c).unwrap(), WireValue::none());
        assert_eq!(to_wire_value(&json!(""), &opt, &c).unwrap(), WireValue::none());
        assert_eq!(
            to_wire_value(&json!("7"), &opt, &c).unwrap(),
            WireValue::some(WireValue::Int(WireInt::U32(7)))
        );
    }

    #[test]
    fn test_enum_casing_variants() {
        let c = ctx();
        let role = IdlType::defined("Role");
        let expected = WireValue::Enum { variant: "admin".into(), payload: EnumPayload::Unit };
        for input in [json!("Admin"), json!("admin"), json!("ADMIN"), json!({ "Admin": {} }), json!({ "admin": {} })] {
            assert_eq!(to_wire_value(&input, &role, &c).unwrap(), expected, "{}", input);
        }
        let super_user = WireValue::Enum { variant: "superUser".into(), payload: EnumPayload::Unit };
        for input in ["SuperUser", "superUser", "super_user", "SUPERUSER"] {
            assert_eq!(to_wire_value(&json!(input), &role, &c).unwrap(), super_user, "{}", input);
        }
    }

    #[test]
    fn test_enum_unknown_lists_variants() {
        let c = ctx();
        let err = to_wire_value(&json!("Guest"), &IdlType::defined("Role"), &c).unwrap_err();
        let msg = err.to_string();
        for name in ["Admin", "SuperUser", "Limited", "Pair"] {
            assert!(msg.contains(name), "{}", msg);
        }
    }

    #[test]
    fn test_enum_payloads() {
        let c = ctx();
        let role = IdlType::defined("Role");
        assert_eq!(
            to_wire_value(&json!({ "limited": { "maxAmount": "9" } }), &role, &c).unwrap(),
            WireValue::Enum {
                variant: "limited".into(),
                payload: EnumPayload::Named(vec![("max_amount".into(), WireValue::Int(WireInt::U64(9)))]),
            }
        );
        let pair = WireValue::Enum {
            variant: "pair".into(),
            payload: EnumPayload::Tuple(vec![WireValue::Int(WireInt::U8(1)), WireValue::Bool(true)]),
        };
        assert_eq!(to_wire_value(&json!({ "Pair": [1, true] }), &role, &c).unwrap(), pair);
        assert_eq!(to_wire_value(&json!({ "Pair": { "0": 1, "1": true } }), &role, &c).unwrap(), pair);

        let err = to_wire_value(&json!({ "Pair": [300, true] }), &role, &c).unwrap_err();
        assert_eq!(err.path(), Some("Pair[0]"));
        let err = to_wire_value(&json!("Limited"), &role, &c).unwrap_err();
        assert!(matches!(err, PdakitError::MissingInput { .. }));
    }

    #[test]
    fn test_struct_from_json_text() {
        let c = ctx();
        let text = format!(r#"{{"owner":"{}","bump":5,"counter":"10"}}"#, OWNER);
        let value = to_wire_value(&json!(text), &IdlType::defined("Config"), &c).unwrap();
        assert_eq!(value.field("bump"), Some(&WireValue::Int(WireInt::U8(5))));
        assert_eq!(value.field("counter"), Some(&WireValue::Int(WireInt::U64(10))));
        assert_eq!(value.field("note"), Some(&WireValue::none()));
    }

    #[test]
    fn test_struct_missing_fields_aggregated() {
        let c = ctx();
        let err = to_wire_value(&json!({ "counter": 1 }), &IdlType::defined("Config"), &c).unwrap_err();
        let PdakitError::MissingInput { message, .. } = &err else {
            panic!("expected missing input, got {:?}", err);
        };
        assert!(message.contains("owner") && message.contains("bump"), "{}", message);

        let err = to_wire_value(&json!({ "bump": 1, "counter": 1 }), &IdlType::defined("Config"), &c).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_nested_error_path() {
        let c = ctx();
        let value = json!({ "items": [
            { "owner": OWNER, "bump": 1, "counter": 1 },
            { "owner": OWNER, "bump": 999, "counter": 1 }
        ] });
        let err = to_wire_value(&value, &IdlType::defined("Wrapper"), &c).unwrap_err();
        assert_eq!(err.path(), Some("items[1].bump"));
    }

    #[test]
    fn test_undefined_and_unknown_types() {
        let c = ctx();
        let err = to_wire_value(&json!({}), &IdlType::defined("Nope"), &c).unwrap_err();
        assert!(matches!(err, PdakitError::Schema(_)));
        let err = to_wire_value(&json!(1), &ty(json!({ "generic": "T" })), &c).unwrap_err();
        assert!(matches!(err, PdakitError::Schema(_)));
    }

    #[test]
    fn test_type_alias() {
        let c = ctx();
        assert_eq!(
            to_wire_value(&json!("42"), &IdlType::defined("Lamports"), &c).unwrap(),
            WireValue::Int(WireInt::U64(42))
        );
        let err = to_wire_value(&json!(1), &IdlType::defined("Loop"), &c).unwrap_err();
        assert!(matches!(err, PdakitError::Schema(ref m) if m.contains("never resolves")), "{}", err);
    }

    #[test]
    fn test_zero_with_large_exponent() {
        let c = ctx();
        let u64_ty = IdlType::primitive("u64");
        assert_eq!(
            to_wire_value(&json!("0e41"), &u64_ty, &c).unwrap(),
            WireValue::Int(WireInt::U64(0))
        );
        assert_eq!(
            to_wire_value(&json!("-0.00e99"), &u64_ty, &c).unwrap(),
            WireValue::Int(WireInt::U64(0))
        );
        let err = to_wire_value(&json!("1e41"), &u64_ty, &c).unwrap_err();
        assert!(err.to_string().contains("too large"), "{}", err);
    }

    #[test]
    fn test_convert_args() {
        let c = ctx();
        let ix = c.idl().instruction("init").unwrap();
        let values = json!({ "amount": "5", "label": "x" });
        let args = convert_args(ix, values.as_object().unwrap(), &c).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args[2], ("memo".to_string(), WireValue::none()));

        let err = convert_args(ix, &Map::new(), &c).unwrap_err();
        assert!(err.to_string().contains("amount, label"));
    }

    #[test]
    fn test_seed_bytes_widths() {
        let cases = [
            ("u8", 1usize),
            ("i8", 1),
            ("u16", 2),
            ("i16", 2),
            ("u32", 4),
            ("i32", 4),
            ("u64", 8),
            ("i64", 8),
        ];
        for (name, width) in cases {
            let bytes = to_seed_bytes(&json!("100"), &IdlType::primitive(name)).unwrap();
            assert_eq!(bytes.len(), width, "{}", name);
            assert_eq!(bytes[0], 100);
            assert!(bytes[1..].iter().all(|b| *b == 0));
        }

        let bytes = to_seed_bytes(&json!(-2), &IdlType::primitive("i16")).unwrap();
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), -2);

        let bytes = to_seed_bytes(&json!("18446744073709551615"), &IdlType::primitive("u64")).unwrap();
        assert_eq!(u64::from_le_bytes(bytes.try_into().unwrap()), u64::MAX);
    }

    #[test]
    fn test_seed_bytes_kinds() {
        assert_eq!(to_seed_bytes(&json!("vault"), &IdlType::primitive("string")).unwrap(), b"vault".to_vec());
        let key = Pubkey::from_str(OWNER).unwrap();
        assert_eq!(to_seed_bytes(&json!(OWNER), &IdlType::primitive("pubkey")).unwrap(), key.to_bytes().to_vec());

        for name in ["u128", "i128", "bool", "bytes", "f64"] {
            let err = to_seed_bytes(&json!(1), &IdlType::primitive(name)).unwrap_err();
            assert!(err.to_string().contains("unsupported seed type"), "{}", name);
        }
        let err = to_seed_bytes(&json!([1]), &ty(json!({ "vec": "u8" }))).unwrap_err();
        assert!(err.to_string().contains("unsupported seed type"));
    }
}
