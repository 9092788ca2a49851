//! IDL type classification and named type resolution
//!
//! [`SchemaContext`] is built once per loaded IDL and only ever read
//! afterwards; conversion and derivation borrow it.

use crate::idl::{
    Idl, IdlEnumVariant, IdlField, IdlType, IdlTypeComplex, IdlTypeDef, IdlTypeDefTy,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Primitive leaf types of the IDL grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    F32,
    F64,
    String,
    Pubkey,
    Bytes,
}

impl Primitive {
    /// Parse an IDL primitive name, accepting the legacy `publicKey` spelling.
    pub fn parse(name: &str) -> Option<Self> {
        let primitive = match name {
            "bool" => Self::Bool,
            "u8" => Self::U8,
            "i8" => Self::I8,
            "u16" => Self::U16,
            "i16" => Self::I16,
            "u32" => Self::U32,
            "i32" => Self::I32,
            "u64" => Self::U64,
            "i64" => Self::I64,
            "u128" => Self::U128,
            "i128" => Self::I128,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "string" => Self::String,
            "pubkey" | "publicKey" => Self::Pubkey,
            "bytes" => Self::Bytes,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::U128 => "u128",
            Self::I128 => "i128",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Pubkey => "pubkey",
            Self::Bytes => "bytes",
        }
    }

    /// Width in bytes for integer types
    pub fn int_width(&self) -> Option<usize> {
        match self {
            Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 => Some(4),
            Self::U64 | Self::I64 => Some(8),
            Self::U128 | Self::I128 => Some(16),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural shape of an [`IdlType`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeShape<'a> {
    Primitive(Primitive),
    Vector(&'a IdlType),
    Optional(&'a IdlType),
    FixedArray(&'a IdlType, usize),
    Defined(&'a str),
    /// A shape this crate does not model; never an error on its own
    Unknown,
}

/// Classify an IDL type. Total: unrecognized shapes map to [`TypeShape::Unknown`].
pub fn classify(ty: &IdlType) -> TypeShape<'_> {
    match ty {
        IdlType::Primitive(name) => match Primitive::parse(name) {
            Some(primitive) => TypeShape::Primitive(primitive),
            None => TypeShape::Unknown,
        },
        IdlType::Complex(complex) => match complex {
            IdlTypeComplex::Vec(inner) => TypeShape::Vector(inner),
            IdlTypeComplex::Option(inner) | IdlTypeComplex::COption(inner) => {
                TypeShape::Optional(inner)
            }
            IdlTypeComplex::Array(inner, size) => TypeShape::FixedArray(inner, *size),
            IdlTypeComplex::Defined { name } => TypeShape::Defined(name),
        },
        IdlType::Other(_) => TypeShape::Unknown,
    }
}

/// Human-readable type name, for diagnostics only
pub fn display_name(ty: &IdlType) -> String {
    match ty {
        IdlType::Primitive(s) => s.clone(),
        IdlType::Complex(complex) => match complex {
            IdlTypeComplex::Vec(inner) => format!("Vec<{}>", display_name(inner)),
            IdlTypeComplex::Option(inner) => format!("Option<{}>", display_name(inner)),
            IdlTypeComplex::COption(inner) => format!("COption<{}>", display_name(inner)),
            IdlTypeComplex::Array(inner, size) => format!("[{}; {}]", display_name(inner), size),
            IdlTypeComplex::Defined { name } => name.clone(),
        },
        IdlType::Other(value) => format!("unknown({})", value),
    }
}

/// Read-only view over one program's IDL, with named types indexed.
#[derive(Debug, Clone)]
pub struct SchemaContext {
    idl: Arc<Idl>,
    index: HashMap<String, usize>,
}

impl SchemaContext {
    pub fn new(idl: Idl) -> Self {
        let index = idl
            .types
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), i))
            .collect();

        Self {
            idl: Arc::new(idl),
            index,
        }
    }

    pub fn idl(&self) -> &Idl {
        &self.idl
    }

    /// Look up a named type definition without following aliases.
    ///
    /// Falls back to the tolerant name matcher, since legacy IDLs and
    /// account-type references do not always agree on casing.
    pub fn lookup(&self, name: &str) -> Option<&IdlTypeDef> {
        if let Some(&i) = self.index.get(name) {
            return Some(&self.idl.types[i]);
        }
        crate::naming::find_by_name(&self.idl.types, name, |def| def.name.as_str())
    }

    /// Resolve a named type, following aliases of other named types.
    ///
    /// The result may still be an alias of a primitive or container type.
    /// `None` when the name is undefined or the alias chain loops.
    pub fn resolve(&self, name: &str) -> Option<&IdlTypeDef> {
        let mut def = self.lookup(name)?;
        for _ in 0..=self.idl.types.len() {
            let IdlTypeDefTy::Type { alias } = &def.ty else {
                return Some(def);
            };
            match classify(alias) {
                TypeShape::Defined(next) => def = self.lookup(next)?,
                _ => return Some(def),
            }
        }
        None
    }

    /// Variants of a named enum, or `None` if the type isn't an enum
    pub fn enum_variants(&self, name: &str) -> Option<&[IdlEnumVariant]> {
        match &self.resolve(name)?.ty {
            IdlTypeDefTy::Enum { variants } => Some(variants),
            _ => None,
        }
    }

    /// Fields of a named struct, or `None` if the type isn't a struct
    pub fn struct_fields(&self, name: &str) -> Option<&[IdlField]> {
        match &self.resolve(name)?.ty {
            IdlTypeDefTy::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Declared type of a field of a named struct, by exact then canonical name
    pub fn field_type(&self, type_name: &str, field: &str) -> Option<&IdlType> {
        let fields = self.struct_fields(type_name)?;
        crate::naming::find_by_name(fields, field, |f| f.name.as_str()).map(|f| &f.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SchemaContext {
        let idl: Idl = serde_json::from_str(
            r#"{
                "address": "11111111111111111111111111111111",
                "metadata": { "name": "t", "version": "0.1.0", "spec": "0.1.0" },
                "instructions": [],
                "accounts": [{ "name": "Pool", "discriminator": [] }],
                "types": [
                    { "name": "Pool", "type": { "kind": "struct", "fields": [
                        { "name": "mint_key", "type": "pubkey" }
                    ] } },
                    { "name": "Role", "type": { "kind": "enum", "variants": [
                        { "name": "Admin" }, { "name": "User" }
                    ] } },
                    { "name": "PoolAlias", "type": { "kind": "type", "alias": { "defined": { "name": "Pool" } } } },
                    { "name": "Lamports", "type": { "kind": "type", "alias": "u64" } },
                    { "name": "Ping", "type": { "kind": "type", "alias": { "defined": { "name": "Pong" } } } },
                    { "name": "Pong", "type": { "kind": "type", "alias": { "defined": { "name": "Ping" } } } }
                ]
            }"#,
        )
        .unwrap();
        SchemaContext::new(idl)
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&IdlType::primitive("u64")),
            TypeShape::Primitive(Primitive::U64)
        );
        assert_eq!(
            classify(&IdlType::primitive("publicKey")),
            TypeShape::Primitive(Primitive::Pubkey)
        );
        assert_eq!(classify(&IdlType::primitive("u256")), TypeShape::Unknown);
        assert_eq!(classify(&IdlType::defined("Pool")), TypeShape::Defined("Pool"));

        let array: IdlType = serde_json::from_str(r#"{"array": ["u8", 32]}"#).unwrap();
        assert!(matches!(classify(&array), TypeShape::FixedArray(_, 32)));

        let other: IdlType = serde_json::from_str(r#"{"generic": "T"}"#).unwrap();
        assert_eq!(classify(&other), TypeShape::Unknown);
    }

    #[test]
    fn test_resolve_kinds() {
        let ctx = context();
        assert!(ctx.resolve("Pool").is_some());
        assert!(ctx.resolve("pool").is_some());
        assert!(ctx.resolve("Missing").is_none());

        assert_eq!(ctx.enum_variants("Role").map(|v| v.len()), Some(2));
        assert!(ctx.enum_variants("Pool").is_none());
        assert_eq!(ctx.struct_fields("Pool").map(|f| f.len()), Some(1));
        assert!(ctx.struct_fields("Role").is_none());
    }

    #[test]
    fn test_field_type_canonical() {
        let ctx = context();
        assert_eq!(ctx.field_type("Pool", "mintKey"), Some(&IdlType::primitive("pubkey")));
        assert!(ctx.field_type("Pool", "other").is_none());
    }

    #[test]
    fn test_resolve_follows_aliases() {
        let ctx = context();
        assert_eq!(ctx.resolve("PoolAlias").map(|d| d.name.as_str()), Some("Pool"));
        assert_eq!(ctx.field_type("PoolAlias", "mint_key"), Some(&IdlType::primitive("pubkey")));

        let lamports = ctx.resolve("Lamports").unwrap();
        assert!(matches!(&lamports.ty, IdlTypeDefTy::Type { alias } if *alias == IdlType::primitive("u64")));
        assert!(ctx.struct_fields("Lamports").is_none());

        assert!(ctx.lookup("Ping").is_some());
        assert!(ctx.resolve("Ping").is_none());
    }

    #[test]
    fn test_display_name() {
        let ty: IdlType =
            serde_json::from_str(r#"{"vec": {"option": {"array": ["u8", 4]}}}"#).unwrap();
        assert_eq!(display_name(&ty), "Vec<Option<[u8; 4]>>");
    }
}
