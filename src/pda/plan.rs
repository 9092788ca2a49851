//! Derivation order for all PDA accounts of one instruction
//!
//! A PDA whose seeds reference another PDA account of the same instruction
//! must be derived after it. Cycles cannot be derived at all and are
//! rejected up front.

use super::engine::{AccountDecoder, AccountFetcher, DerivedAddress, Deriver};
use super::inputs::DerivationInputs;
use super::readiness::{check_readiness, Readiness};
use crate::error::{PdakitError, PdakitResult};
use crate::idl::{IdlAccount, IdlInstruction, IdlSeed};
use crate::naming;
use tracing::debug;

/// Order the instruction's PDA accounts so dependencies come first.
///
/// Independent accounts keep their declaration order.
pub fn plan_derivations(instruction: &IdlInstruction) -> PdakitResult<Vec<&IdlAccount>> {
    let pdas: Vec<&IdlAccount> = instruction
        .flat_accounts()
        .into_iter()
        .filter(|account| account.pda.is_some())
        .collect();

    // deps[i] holds indices into `pdas` that account i reads
    let deps: Vec<Vec<usize>> = pdas
        .iter()
        .map(|account| {
            let mut out = Vec::new();
            if let Some(pda) = &account.pda {
                for seed in pda.seeds.iter().chain(pda.program.iter()) {
                    if let IdlSeed::Account { path, .. } = seed {
                        let (root, _) = IdlSeed::split_path(path);
                        let target = pdas
                            .iter()
                            .position(|other| naming::match_name(root, &other.name).is_some());
                        if let Some(target) = target {
                            if !out.contains(&target) {
                                out.push(target);
                            }
                        }
                    }
                }
            }
            out
        })
        .collect();

    let mut done = vec![false; pdas.len()];
    let mut order = Vec::with_capacity(pdas.len());

    while order.len() < pdas.len() {
        let next = (0..pdas.len()).find(|&i| !done[i] && deps[i].iter().all(|&d| done[d] || d == i));
        match next {
            Some(i) => {
                done[i] = true;
                order.push(pdas[i]);
            }
            None => {
                let stuck: Vec<&str> = (0..pdas.len())
                    .filter(|&i| !done[i])
                    .map(|i| pdas[i].name.as_str())
                    .collect();
                return Err(PdakitError::Schema(format!(
                    "cyclic seed dependency between accounts: {}",
                    stuck.join(", ")
                )));
            }
        }
    }

    Ok(order)
}

/// Outcome of deriving every PDA account of an instruction
#[derive(Debug, Clone, Default)]
pub struct DeriveAllReport {
    pub derived: Vec<(String, DerivedAddress)>,
    /// Accounts skipped because their inputs are not ready yet
    pub pending: Vec<(String, Readiness)>,
}

impl<'a, F, D> Deriver<'a, F, D>
where
    F: AccountFetcher,
    D: AccountDecoder,
{
    /// Derive every PDA account of `instruction` in dependency order.
    ///
    /// Each derived address is visible to later accounts in the plan.
    /// Accounts the caller already supplied an address for are left alone.
    pub async fn derive_all(
        &self,
        instruction: &IdlInstruction,
        inputs: &DerivationInputs,
    ) -> PdakitResult<DeriveAllReport> {
        let plan = plan_derivations(instruction)?;
        let program_id = self.program_id()?;
        let mut working = inputs.clone();
        let mut report = DeriveAllReport::default();

        for account in plan {
            let Some(pda) = &account.pda else { continue };

            if working.known_address(&account.name).is_some() {
                continue;
            }

            let readiness = check_readiness(pda, &working);
            if !readiness.is_ready() {
                debug!(account = %account.name, status = %readiness.status_text(), "skipping PDA");
                report.pending.push((account.name.clone(), readiness));
                continue;
            }

            let derived = self.derive(instruction, pda, &program_id, &working).await?;
            working
                .accounts
                .insert(account.name.clone(), Some(derived.address));
            report.derived.push((account.name.clone(), derived));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instruction(accounts: serde_json::Value) -> IdlInstruction {
        serde_json::from_value(json!({ "name": "ix", "accounts": accounts, "args": [] })).unwrap()
    }

    #[test]
    fn test_dependencies_first() {
        let ix = instruction(json!([
            { "name": "vault", "pda": { "seeds": [
                { "kind": "const", "value": [1] },
                { "kind": "account", "path": "pool" }
            ] } },
            { "name": "authority", "signer": true },
            { "name": "pool", "pda": { "seeds": [{ "kind": "account", "path": "authority" }] } },
            { "name": "config", "pda": { "seeds": [{ "kind": "const", "value": [2] }] } }
        ]));
        let order: Vec<&str> = plan_derivations(&ix)
            .unwrap()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(order, vec!["pool", "vault", "config"]);
    }

    #[test]
    fn test_cycle_rejected() {
        let ix = instruction(json!([
            { "name": "a", "pda": { "seeds": [{ "kind": "account", "path": "b.key", "account": "B" }] } },
            { "name": "b", "pda": { "seeds": [{ "kind": "account", "path": "a" }] } },
            { "name": "c", "pda": { "seeds": [{ "kind": "const", "value": [3] }] } }
        ]));
        let err = plan_derivations(&ix).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, PdakitError::Schema(_)));
        assert!(msg.ends_with("accounts: a, b"), "{}", msg);
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let ix = instruction(json!([
            { "name": "a", "pda": { "seeds": [{ "kind": "account", "path": "a" }] } }
        ]));
        assert_eq!(plan_derivations(&ix).unwrap().len(), 1);
    }
}
