//! Anchor IDL type definitions (0.29+ format)
//!
//! These types represent the structure of an Anchor IDL JSON file.

use serde::Deserialize;

/// Root IDL structure
#[derive(Debug, Clone, Deserialize)]
pub struct Idl {
    /// Program address (base58)
    pub address: String,

    /// IDL metadata
    pub metadata: IdlMetadata,

    /// Program instructions
    pub instructions: Vec<IdlInstruction>,

    /// Account discriminators (references to types)
    #[serde(default)]
    pub accounts: Vec<IdlAccountRef>,

    /// Custom types defined by the program
    #[serde(default)]
    pub types: Vec<IdlTypeDef>,
}

/// IDL metadata
#[derive(Debug, Clone, Deserialize)]
pub struct IdlMetadata {
    /// Program name
    pub name: String,

    /// Program version
    pub version: String,

    /// IDL spec version
    pub spec: String,

    /// Program description
    #[serde(default)]
    pub description: Option<String>,
}

/// Instruction definition
#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstruction {
    /// Instruction name
    pub name: String,

    /// Discriminator bytes
    #[serde(default)]
    pub discriminator: Vec<u8>,

    /// Accounts required by this instruction
    pub accounts: Vec<IdlAccountItem>,

    /// Arguments to this instruction
    pub args: Vec<IdlField>,
}

impl Idl {
    /// Find an instruction by exact name, then by canonical name
    pub fn instruction(&self, name: &str) -> Option<&IdlInstruction> {
        crate::naming::find_by_name(&self.instructions, name, |ix| ix.name.as_str())
    }
}

impl IdlInstruction {
    /// Declared argument by name
    pub fn arg(&self, name: &str) -> Option<&IdlField> {
        crate::naming::find_by_name(&self.args, name, |arg| arg.name.as_str())
    }

    /// Find a single account by name, searching nested groups
    pub fn find_account(&self, name: &str) -> Option<&IdlAccount> {
        let all = self.flat_accounts();
        crate::naming::find_by_name(&all, name, |acc| acc.name.as_str()).copied()
    }

    /// All single accounts, nested groups flattened in declaration order
    pub fn flat_accounts(&self) -> Vec<&IdlAccount> {
        let mut out = Vec::new();
        flatten_accounts(&self.accounts, &mut out);
        out
    }
}

fn flatten_accounts<'a>(items: &'a [IdlAccountItem], out: &mut Vec<&'a IdlAccount>) {
    for item in items {
        match item {
            IdlAccountItem::Single(account) => out.push(account),
            IdlAccountItem::Group(group) => flatten_accounts(&group.accounts, out),
        }
    }
}

/// Account item (can be a single account or nested group)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdlAccountItem {
    /// Nested group of accounts (tried first: a group also has a `name`)
    Group(IdlAccountGroup),
    /// Single account
    Single(IdlAccount),
}

/// Single account in an instruction
#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccount {
    /// Account name
    pub name: String,

    /// Whether this account is writable
    #[serde(default)]
    pub writable: bool,

    /// Whether this account must sign
    #[serde(default)]
    pub signer: bool,

    /// Whether this account is optional
    #[serde(default)]
    pub optional: bool,

    /// Account address (for known accounts like system program)
    #[serde(default)]
    pub address: Option<String>,

    /// PDA seeds if this is a PDA
    #[serde(default)]
    pub pda: Option<IdlPda>,
}

/// Group of accounts (nested)
#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccountGroup {
    /// Group name
    pub name: String,

    /// Accounts in this group
    pub accounts: Vec<IdlAccountItem>,
}

/// PDA definition
#[derive(Debug, Clone, Deserialize)]
pub struct IdlPda {
    /// PDA seeds, consumed in order
    pub seeds: Vec<IdlSeed>,

    /// Program to derive under, when not the instruction's own program
    #[serde(default)]
    pub program: Option<IdlSeed>,
}

/// PDA seed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdlSeed {
    /// Constant seed (literal bytes)
    Const { value: Vec<u8> },
    /// Account seed: the account's address, or a field of its data when
    /// `path` is dotted (`pool.mint`)
    Account {
        path: String,
        /// Account type that owns the field, for dotted paths
        #[serde(default)]
        account: Option<String>,
    },
    /// Argument seed (value from instruction args)
    Arg { path: String },
}

impl IdlSeed {
    /// Split a dotted path into its root and the remaining field path.
    pub fn split_path(path: &str) -> (&str, Option<&str>) {
        match path.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (path, None),
        }
    }
}

/// Field definition (for args and struct fields)
#[derive(Debug, Clone, Deserialize)]
pub struct IdlField {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub ty: IdlType,
}

/// Type definition (struct or enum)
#[derive(Debug, Clone, Deserialize)]
pub struct IdlTypeDef {
    /// Type name
    pub name: String,

    /// Type definition
    #[serde(rename = "type")]
    pub ty: IdlTypeDefTy,
}

/// Type definition body
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdlTypeDefTy {
    /// Struct type
    Struct { fields: Vec<IdlField> },
    /// Enum type
    Enum { variants: Vec<IdlEnumVariant> },
    /// Type alias (`{"kind": "type", "alias": "u64"}`)
    Type { alias: IdlType },
}

/// Enum variant
#[derive(Debug, Clone, Deserialize)]
pub struct IdlEnumVariant {
    /// Variant name
    pub name: String,

    /// Variant fields (if tuple or struct variant)
    #[serde(default)]
    pub fields: Option<IdlEnumFields>,
}

/// Enum variant fields - can be tuple-style (unnamed) or struct-style (named)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdlEnumFields {
    /// Struct variant: fields have names and types (e.g., [{"name": "x", "type": "u64"}])
    Named(Vec<IdlField>),
    /// Tuple variant: fields are just types (e.g., ["u64", "pubkey"])
    Tuple(Vec<IdlType>),
}

/// IDL type (primitives and composites)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdlType {
    /// Primitive type as string (u8, u64, bool, pubkey, etc.)
    Primitive(String),

    /// Complex type
    Complex(IdlTypeComplex),

    /// Any shape this crate does not model (generics, newer IDL kinds)
    Other(serde_json::Value),
}

/// Complex IDL types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdlTypeComplex {
    /// Vec<T>
    Vec(Box<IdlType>),
    /// Option<T>
    Option(Box<IdlType>),
    /// COption<T>, same value semantics as Option
    #[serde(rename = "coption")]
    COption(Box<IdlType>),
    /// [T; N]
    Array(Box<IdlType>, usize),
    /// Reference to a defined type
    Defined { name: String },
}

impl IdlType {
    pub fn primitive(name: &str) -> Self {
        IdlType::Primitive(name.to_string())
    }

    pub fn defined(name: &str) -> Self {
        IdlType::Complex(IdlTypeComplex::Defined {
            name: name.to_string(),
        })
    }
}

/// Account reference (root-level accounts array)
/// Just a discriminator reference - actual type is in `types`
#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccountRef {
    /// Account type name
    pub name: String,

    /// Account discriminator bytes
    #[serde(default)]
    pub discriminator: Vec<u8>,
}
