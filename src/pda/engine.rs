//! PDA derivation from IDL seed recipes
//!
//! Seeds are resolved to byte buffers in recipe order. Account-field seeds
//! need the owning account's on-chain data, which arrives through an
//! [`AccountFetcher`] and is decoded by an [`AccountDecoder`]; both are
//! passed in explicitly so the engine never owns a connection.

use super::inputs::DerivationInputs;
use crate::error::{PdakitError, PdakitResult};
use crate::idl::{IdlInstruction, IdlPda, IdlSeed, IdlType, IdlTypeDefTy};
use crate::naming;
use crate::normalize::{as_object, to_seed_bytes};
use crate::schema::{classify, SchemaContext, TypeShape};
use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::{Map, Value};
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};
use std::str::FromStr;
use tracing::{debug, trace};

/// Raw on-chain account as returned by a fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Source of on-chain account data
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    /// Fetch an account; `Ok(None)` when it does not exist.
    async fn fetch_account(&self, address: &Pubkey) -> PdakitResult<Option<FetchedAccount>>;
}

/// Decodes raw account data against a named IDL account type
pub trait AccountDecoder: Send + Sync {
    fn decode(&self, account_type: &str, data: &[u8]) -> PdakitResult<Map<String, Value>>;
}

/// Decoder for hosts that have no account decoding available.
///
/// Every decode fails with [`PdakitError::Resolution`], so recipes without
/// account-field seeds still derive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderUnavailable;

impl AccountDecoder for DecoderUnavailable {
    fn decode(&self, account_type: &str, _data: &[u8]) -> PdakitResult<Map<String, Value>> {
        Err(PdakitError::Resolution(format!(
            "no decoder available for {} account data",
            account_type
        )))
    }
}

/// Result of a successful derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
    pub program_id: Pubkey,
    /// Seed buffers in recipe order, bump excluded
    pub seeds: Vec<Vec<u8>>,
}

/// Check seed buffer limits and run the off-curve address search.
pub fn find_program_address(seeds: &[Vec<u8>], program_id: &Pubkey) -> PdakitResult<(Pubkey, u8)> {
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(PdakitError::SeedSize {
                index,
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
    }

    // the bump takes one seed slot
    if seeds.len() >= MAX_SEEDS {
        return Err(PdakitError::Schema(format!(
            "{} seeds given, at most {} allowed",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }

    let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
    Pubkey::try_find_program_address(&refs, program_id).ok_or_else(|| {
        PdakitError::Resolution(format!("no off-curve address found under {}", program_id))
    })
}

/// Derives PDAs for one loaded IDL
pub struct Deriver<'a, F, D> {
    ctx: &'a SchemaContext,
    fetcher: &'a F,
    decoder: &'a D,
}

impl<'a, F, D> Deriver<'a, F, D>
where
    F: AccountFetcher,
    D: AccountDecoder,
{
    pub fn new(ctx: &'a SchemaContext, fetcher: &'a F, decoder: &'a D) -> Self {
        Self {
            ctx,
            fetcher,
            decoder,
        }
    }

    pub fn context(&self) -> &SchemaContext {
        self.ctx
    }

    /// Program id declared by the IDL
    pub fn program_id(&self) -> PdakitResult<Pubkey> {
        let address = &self.ctx.idl().address;
        Pubkey::from_str(address).map_err(|_| PdakitError::InvalidProgramId(address.clone()))
    }

    /// Derive the PDA of `account_name` in `instruction_name` under the IDL's program.
    pub async fn derive_account(
        &self,
        instruction_name: &str,
        account_name: &str,
        inputs: &DerivationInputs,
    ) -> PdakitResult<DerivedAddress> {
        let instruction = self.ctx.idl().instruction(instruction_name).ok_or_else(|| {
            PdakitError::Schema(format!("instruction '{}' not found", instruction_name))
        })?;
        let account = instruction.find_account(account_name).ok_or_else(|| {
            PdakitError::Schema(format!(
                "account '{}' not found in instruction '{}'",
                account_name, instruction.name
            ))
        })?;
        let pda = account.pda.as_ref().ok_or_else(|| {
            PdakitError::Schema(format!("account '{}' has no PDA seeds", account.name))
        })?;

        self.derive(instruction, pda, &self.program_id()?, inputs).await
    }

    /// Derive an address from `pda`'s recipe.
    ///
    /// `program_id` is used unless the recipe names its own program.
    pub async fn derive(
        &self,
        instruction: &IdlInstruction,
        pda: &IdlPda,
        program_id: &Pubkey,
        inputs: &DerivationInputs,
    ) -> PdakitResult<DerivedAddress> {
        let seeds = self.seed_buffers(instruction, &pda.seeds, inputs).await?;

        let program_id = match &pda.program {
            Some(seed) => self.program_override(instruction, seed, inputs).await?,
            None => *program_id,
        };

        let (address, bump) = find_program_address(&seeds, &program_id)?;
        debug!(instruction = %instruction.name, %address, bump, %program_id, "derived PDA");

        Ok(DerivedAddress {
            address,
            bump,
            program_id,
            seeds,
        })
    }

    /// Resolve every seed to bytes.
    ///
    /// Account fetches run concurrently; the buffers come back in recipe order.
    pub async fn seed_buffers(
        &self,
        instruction: &IdlInstruction,
        seeds: &[IdlSeed],
        inputs: &DerivationInputs,
    ) -> PdakitResult<Vec<Vec<u8>>> {
        try_join_all(
            seeds
                .iter()
                .map(|seed| self.resolve_seed(instruction, seed, inputs)),
        )
        .await
    }

    async fn program_override(
        &self,
        instruction: &IdlInstruction,
        seed: &IdlSeed,
        inputs: &DerivationInputs,
    ) -> PdakitResult<Pubkey> {
        let bytes = self.resolve_seed(instruction, seed, inputs).await?;
        let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            PdakitError::Schema(format!(
                "PDA program must resolve to 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Pubkey::new_from_array(array))
    }

    async fn resolve_seed(
        &self,
        instruction: &IdlInstruction,
        seed: &IdlSeed,
        inputs: &DerivationInputs,
    ) -> PdakitResult<Vec<u8>> {
        let bytes = match seed {
            IdlSeed::Const { value } => value.clone(),
            IdlSeed::Arg { path } => self.arg_seed(instruction, path, inputs)?,
            IdlSeed::Account { path, account } => match IdlSeed::split_path(path) {
                (name, None) => inputs
                    .known_address(name)
                    .ok_or_else(|| {
                        PdakitError::missing(
                            name,
                            format!("account: {} must be known to derive this address", name),
                        )
                    })?
                    .to_bytes()
                    .to_vec(),
                (name, Some(field)) => {
                    self.account_field_seed(name, field, account.as_deref(), inputs)
                        .await?
                }
            },
        };
        trace!(?seed, len = bytes.len(), "resolved seed");
        Ok(bytes)
    }

    fn arg_seed(
        &self,
        instruction: &IdlInstruction,
        path: &str,
        inputs: &DerivationInputs,
    ) -> PdakitResult<Vec<u8>> {
        let (root, rest) = IdlSeed::split_path(path);

        let arg = instruction.arg(root).ok_or_else(|| {
            PdakitError::Schema(format!(
                "seed references argument '{}' not declared on instruction '{}'",
                root, instruction.name
            ))
        })?;
        let value = inputs.arg(root).ok_or_else(|| {
            PdakitError::missing(root, format!("arg: {} is required to derive this address", root))
        })?;

        let mut ty = &arg.ty;
        let mut value = value.clone();
        for segment in rest.into_iter().flat_map(|r| r.split('.')) {
            ty = self.nested_field_type(ty, segment).ok_or_else(|| {
                PdakitError::Schema(format!("no type metadata for '{}' in seed path '{}'", segment, path))
            })?;
            let next = {
                let object = as_object(&value).map_err(|e| e.at(path))?;
                naming::get_field(&object, segment).cloned()
            };
            value = next.ok_or_else(|| {
                PdakitError::missing(path, format!("arg: {} has no field '{}'", root, segment))
            })?;
        }

        to_seed_bytes(&value, ty).map_err(|e| e.at(path))
    }

    async fn account_field_seed(
        &self,
        name: &str,
        field: &str,
        owner_type: Option<&str>,
        inputs: &DerivationInputs,
    ) -> PdakitResult<Vec<u8>> {
        let path = format!("{}.{}", name, field);
        let owner_type = owner_type.ok_or_else(|| {
            PdakitError::Schema(format!("seed '{}' does not name the account type to decode", path))
        })?;

        let address = inputs.owner_address(name).ok_or_else(|| {
            PdakitError::missing(name, format!("account: {} must be known to read '{}'", name, path))
        })?;

        debug!(account = name, %address, "fetching account for field seed");
        let fetched = self.fetcher.fetch_account(&address).await?.ok_or_else(|| {
            PdakitError::Resolution(format!("account '{}' ({}) does not exist on chain", name, address))
        })?;

        let decoded = self.decoder.decode(owner_type, &fetched.data)?;

        let mut ty: Option<&IdlType> = None;
        let mut value: Option<Value> = None;
        for segment in field.split('.') {
            let next_ty = match ty {
                None => self.ctx.field_type(owner_type, segment),
                Some(parent) => self.nested_field_type(parent, segment),
            };
            ty = Some(next_ty.ok_or_else(|| {
                PdakitError::Schema(format!(
                    "no type metadata for field '{}' of account type {}",
                    field, owner_type
                ))
            })?);

            let next_value = match &value {
                None => naming::get_field(&decoded, segment).cloned(),
                Some(parent) => parent
                    .as_object()
                    .and_then(|object| naming::get_field(object, segment))
                    .cloned(),
            };
            value = Some(next_value.ok_or_else(|| {
                PdakitError::Resolution(format!(
                    "decoded {} account has no field '{}'",
                    owner_type, field
                ))
            })?);
        }

        match (value, ty) {
            (Some(value), Some(ty)) => to_seed_bytes(&value, ty).map_err(|e| e.at(&path)),
            _ => Err(PdakitError::Schema(format!("empty field path in seed '{}'", path))),
        }
    }

    /// Type of `field` inside a defined struct type
    fn nested_field_type(&self, parent: &IdlType, field: &str) -> Option<&'a IdlType> {
        let TypeShape::Defined(name) = classify(parent) else {
            return None;
        };
        match &self.ctx.resolve(name)?.ty {
            IdlTypeDefTy::Struct { .. } => self.ctx.field_type(name, field),
            IdlTypeDefTy::Enum { .. } => None,
            IdlTypeDefTy::Type { alias } => self.nested_field_type(alias, field),
        }
    }
}
