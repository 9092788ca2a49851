//! Legacy Anchor IDL format support (pre-0.29)
//!
//! Legacy IDLs spell seeds with an explicit `type`, keep account structs
//! under `accounts` and reference defined types by bare string. Everything
//! is converted to the canonical (0.1.0 spec) model; const seeds are encoded
//! to bytes here so the engine only ever sees raw bytes.

use serde::Deserialize;

use super::types::{
    Idl, IdlAccount, IdlAccountGroup, IdlAccountItem, IdlAccountRef, IdlEnumFields,
    IdlEnumVariant, IdlField, IdlInstruction, IdlMetadata, IdlPda, IdlSeed, IdlType,
    IdlTypeComplex, IdlTypeDef, IdlTypeDefTy,
};
use crate::error::{PdakitError, PdakitResult};
use crate::normalize::to_seed_bytes;
use crate::schema::{classify, Primitive, TypeShape};

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyIdl {
    /// Program name (at root level in legacy)
    pub name: String,

    /// Program version (at root level in legacy)
    pub version: String,

    /// Legacy metadata (different structure - has address, origin, etc.)
    #[serde(default)]
    pub metadata: Option<LegacyMetadata>,

    #[serde(default)]
    pub instructions: Vec<LegacyInstruction>,

    /// Account type definitions (full structs, not refs)
    #[serde(default)]
    pub accounts: Vec<LegacyTypeDef>,

    #[serde(default)]
    pub types: Vec<LegacyTypeDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMetadata {
    /// Program address (in legacy metadata)
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyInstruction {
    pub name: String,

    #[serde(default)]
    pub accounts: Vec<LegacyAccountItem>,

    #[serde(default)]
    pub args: Vec<LegacyField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyAccountItem {
    Group {
        name: String,
        accounts: Vec<LegacyAccountItem>,
    },
    Single(LegacyInstructionAccount),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyInstructionAccount {
    pub name: String,

    #[serde(default)]
    #[serde(rename = "isMut")]
    pub is_mut: bool,

    #[serde(default)]
    #[serde(rename = "isSigner")]
    pub is_signer: bool,

    #[serde(default)]
    #[serde(rename = "isOptional")]
    pub is_optional: bool,

    #[serde(default)]
    pub pda: Option<LegacyPda>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPda {
    #[serde(default)]
    pub seeds: Vec<LegacySeed>,

    #[serde(default, rename = "programId")]
    pub program_id: Option<LegacySeed>,
}

/// Seed with its declared type, e.g. `{"kind":"const","type":"string","value":"vault"}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LegacySeed {
    Const {
        #[serde(rename = "type")]
        ty: LegacyType,
        value: serde_json::Value,
    },
    Arg {
        path: String,
    },
    Account {
        path: String,
        #[serde(default)]
        account: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTypeDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: LegacyTypeDefTy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LegacyTypeDefTy {
    Struct {
        #[serde(default)]
        fields: Vec<LegacyField>,
    },
    Enum {
        #[serde(default)]
        variants: Vec<LegacyEnumVariant>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEnumVariant {
    pub name: String,

    #[serde(default)]
    pub fields: Option<LegacyEnumFields>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyEnumFields {
    Named(Vec<LegacyField>),
    Tuple(Vec<LegacyType>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyField {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: LegacyType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyType {
    /// Primitive type as string (u8, u64, bool, publicKey, etc.)
    Primitive(String),

    /// Complex type as object
    Complex(LegacyTypeComplex),

    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegacyTypeComplex {
    Vec(Box<LegacyType>),

    Option(Box<LegacyType>),

    #[serde(rename = "coption")]
    COption(Box<LegacyType>),

    /// [T; N] - array with size
    Array(Box<LegacyType>, usize),

    /// Reference to a defined type - legacy uses string directly
    Defined(String),
}

impl TryFrom<LegacyIdl> for Idl {
    type Error = PdakitError;

    fn try_from(legacy: LegacyIdl) -> PdakitResult<Self> {
        let address = legacy
            .metadata
            .as_ref()
            .and_then(|m| m.address.clone())
            .unwrap_or_default();

        let instructions = legacy
            .instructions
            .into_iter()
            .map(IdlInstruction::try_from)
            .collect::<PdakitResult<Vec<_>>>()?;

        Ok(Idl {
            address,
            metadata: IdlMetadata {
                name: legacy.name,
                version: legacy.version,
                spec: "legacy".to_string(),
                description: None,
            },
            instructions,
            accounts: legacy
                .accounts
                .iter()
                .map(|a| IdlAccountRef {
                    name: a.name.clone(),
                    discriminator: vec![],
                })
                .collect(),
            types: legacy
                .accounts
                .into_iter()
                .chain(legacy.types)
                .map(Into::into)
                .collect(),
        })
    }
}

impl TryFrom<LegacyInstruction> for IdlInstruction {
    type Error = PdakitError;

    fn try_from(legacy: LegacyInstruction) -> PdakitResult<Self> {
        let accounts = legacy
            .accounts
            .into_iter()
            .map(IdlAccountItem::try_from)
            .collect::<PdakitResult<Vec<_>>>()
            .map_err(|e| in_instruction(e, &legacy.name))?;

        Ok(IdlInstruction {
            name: legacy.name,
            discriminator: vec![],
            accounts,
            args: legacy.args.into_iter().map(Into::into).collect(),
        })
    }
}

fn in_instruction(err: PdakitError, name: &str) -> PdakitError {
    match err {
        PdakitError::Schema(msg) => PdakitError::Schema(format!("instruction '{}': {}", name, msg)),
        other => other,
    }
}

impl TryFrom<LegacyAccountItem> for IdlAccountItem {
    type Error = PdakitError;

    fn try_from(legacy: LegacyAccountItem) -> PdakitResult<Self> {
        match legacy {
            LegacyAccountItem::Group { name, accounts } => {
                let accounts = accounts
                    .into_iter()
                    .map(IdlAccountItem::try_from)
                    .collect::<PdakitResult<Vec<_>>>()?;
                Ok(IdlAccountItem::Group(IdlAccountGroup { name, accounts }))
            }
            LegacyAccountItem::Single(account) => {
                let pda = account.pda.map(IdlPda::try_from).transpose()?;
                Ok(IdlAccountItem::Single(IdlAccount {
                    name: account.name,
                    writable: account.is_mut,
                    signer: account.is_signer,
                    optional: account.is_optional,
                    address: None,
                    pda,
                }))
            }
        }
    }
}

impl TryFrom<LegacyPda> for IdlPda {
    type Error = PdakitError;

    fn try_from(legacy: LegacyPda) -> PdakitResult<Self> {
        Ok(IdlPda {
            seeds: legacy
                .seeds
                .into_iter()
                .map(IdlSeed::try_from)
                .collect::<PdakitResult<Vec<_>>>()?,
            program: legacy.program_id.map(IdlSeed::try_from).transpose()?,
        })
    }
}

impl TryFrom<LegacySeed> for IdlSeed {
    type Error = PdakitError;

    fn try_from(legacy: LegacySeed) -> PdakitResult<Self> {
        match legacy {
            LegacySeed::Const { ty, value } => {
                let ty: IdlType = ty.into();
                let value = const_seed_bytes(&value, &ty).map_err(|e| {
                    PdakitError::Schema(format!("invalid legacy const seed {}: {}", value, e))
                })?;
                Ok(IdlSeed::Const { value })
            }
            LegacySeed::Arg { path } => Ok(IdlSeed::Arg { path }),
            LegacySeed::Account { path, account } => Ok(IdlSeed::Account { path, account }),
        }
    }
}

/// Encode a typed legacy const value; byte arrays pass through as-is.
fn const_seed_bytes(value: &serde_json::Value, ty: &IdlType) -> PdakitResult<Vec<u8>> {
    let is_byte_list = match classify(ty) {
        TypeShape::Primitive(Primitive::Bytes) => true,
        TypeShape::FixedArray(inner, _) | TypeShape::Vector(inner) => {
            classify(inner) == TypeShape::Primitive(Primitive::U8)
        }
        _ => false,
    };

    if is_byte_list {
        if let Some(items) = value.as_array() {
            return items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| PdakitError::mismatch(format!("{} is not a byte", item)))
                })
                .collect();
        }
        if let Some(text) = value.as_str() {
            return Ok(text.as_bytes().to_vec());
        }
    }

    to_seed_bytes(value, ty)
}

impl From<LegacyTypeDef> for IdlTypeDef {
    fn from(legacy: LegacyTypeDef) -> Self {
        IdlTypeDef {
            name: legacy.name,
            ty: legacy.ty.into(),
        }
    }
}

impl From<LegacyTypeDefTy> for IdlTypeDefTy {
    fn from(legacy: LegacyTypeDefTy) -> Self {
        match legacy {
            LegacyTypeDefTy::Struct { fields } => IdlTypeDefTy::Struct {
                fields: fields.into_iter().map(Into::into).collect(),
            },
            LegacyTypeDefTy::Enum { variants } => IdlTypeDefTy::Enum {
                variants: variants.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<LegacyEnumVariant> for IdlEnumVariant {
    fn from(legacy: LegacyEnumVariant) -> Self {
        IdlEnumVariant {
            name: legacy.name,
            fields: legacy.fields.map(|fields| match fields {
                LegacyEnumFields::Named(named) => {
                    IdlEnumFields::Named(named.into_iter().map(Into::into).collect())
                }
                LegacyEnumFields::Tuple(types) => {
                    IdlEnumFields::Tuple(types.into_iter().map(Into::into).collect())
                }
            }),
        }
    }
}

impl From<LegacyField> for IdlField {
    fn from(legacy: LegacyField) -> Self {
        IdlField {
            name: legacy.name,
            ty: legacy.ty.into(),
        }
    }
}

impl From<LegacyType> for IdlType {
    fn from(legacy: LegacyType) -> Self {
        match legacy {
            LegacyType::Primitive(s) => {
                if s == "publicKey" {
                    IdlType::Primitive("pubkey".to_string())
                } else {
                    IdlType::Primitive(s)
                }
            }
            LegacyType::Complex(complex) => IdlType::Complex(complex.into()),
            LegacyType::Other(value) => IdlType::Other(value),
        }
    }
}

impl From<LegacyTypeComplex> for IdlTypeComplex {
    fn from(legacy: LegacyTypeComplex) -> Self {
        match legacy {
            LegacyTypeComplex::Vec(inner) => IdlTypeComplex::Vec(Box::new((*inner).into())),
            LegacyTypeComplex::Option(inner) => IdlTypeComplex::Option(Box::new((*inner).into())),
            LegacyTypeComplex::COption(inner) => {
                IdlTypeComplex::COption(Box::new((*inner).into()))
            }
            LegacyTypeComplex::Array(inner, size) => {
                IdlTypeComplex::Array(Box::new((*inner).into()), size)
            }
            LegacyTypeComplex::Defined(name) => IdlTypeComplex::Defined { name },
        }
    }
}
