//! Per-attempt values supplied by the caller

use crate::naming;
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

/// Argument values and known account addresses for one derivation attempt.
///
/// Built fresh for every attempt and dropped afterwards; the engine never
/// keeps a copy.
#[derive(Debug, Clone, Default)]
pub struct DerivationInputs {
    /// Instruction argument values, as collected from the user
    pub args: Map<String, Value>,
    /// Account name to address; `None` marks an account the caller knows of
    /// but has no address for yet
    pub accounts: HashMap<String, Option<Pubkey>>,
}

impl DerivationInputs {
    pub fn new(args: Map<String, Value>, accounts: HashMap<String, Option<Pubkey>>) -> Self {
        Self { args, accounts }
    }

    pub fn with_arg(mut self, name: &str, value: Value) -> Self {
        self.args.insert(name.to_string(), value);
        self
    }

    pub fn with_account(mut self, name: &str, address: Pubkey) -> Self {
        self.accounts.insert(name.to_string(), Some(address));
        self
    }

    /// Supplied argument value; null and "" count as not supplied
    pub fn arg(&self, name: &str) -> Option<&Value> {
        naming::get_field(&self.args, name).filter(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }

    /// Address from the known-accounts map, by exact then tolerant name.
    ///
    /// Keys are scanned in sorted order, so when several keys match at the
    /// same stage (`pool_state` and `PoolState`) the smallest one wins.
    pub fn known_address(&self, name: &str) -> Option<Pubkey> {
        if let Some(entry) = self.accounts.get(name) {
            return *entry;
        }
        let mut keys: Vec<&String> = self.accounts.keys().collect();
        keys.sort();
        let key = naming::find_by_name(&keys, name, |key| key.as_str())?;
        self.accounts.get(key.as_str()).copied().flatten()
    }

    /// Address of an account that owns a field seed.
    ///
    /// The argument map wins over the known-accounts map, since forms may
    /// supply the same address both ways.
    pub fn owner_address(&self, name: &str) -> Option<Pubkey> {
        self.arg(name)
            .and_then(Value::as_str)
            .and_then(|text| Pubkey::from_str(text.trim()).ok())
            .or_else(|| self.known_address(name))
    }
}
