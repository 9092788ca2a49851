//! Synchronous check of whether a seed recipe can be derived yet

use super::inputs::DerivationInputs;
use crate::idl::{IdlPda, IdlSeed};
use std::fmt;

/// A value the caller still has to provide
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MissingDependency {
    Arg(String),
    Account(String),
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingDependency::Arg(name) => write!(f, "arg: {}", name),
            MissingDependency::Account(name) => write!(f, "account: {}", name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    pub missing: Vec<MissingDependency>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }

    /// One-line status for a form footer or CLI
    pub fn status_text(&self) -> String {
        if self.is_ready() {
            "ready".to_string()
        } else {
            let labels: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
            format!("waiting for {}", labels.join(", "))
        }
    }
}

/// Check every seed of `pda` (and its program seed) against `inputs`.
///
/// Field seeds (`pool.mint`) only need the owning account's address; the
/// field itself is read during derivation.
pub fn check_readiness(pda: &IdlPda, inputs: &DerivationInputs) -> Readiness {
    let mut missing = Vec::new();

    for seed in pda.seeds.iter().chain(pda.program.iter()) {
        let dependency = match seed {
            IdlSeed::Const { .. } => None,
            IdlSeed::Arg { path } => {
                let (root, _) = IdlSeed::split_path(path);
                inputs
                    .arg(root)
                    .is_none()
                    .then(|| MissingDependency::Arg(root.to_string()))
            }
            IdlSeed::Account { path, .. } => match IdlSeed::split_path(path) {
                (name, None) => inputs
                    .known_address(name)
                    .is_none()
                    .then(|| MissingDependency::Account(name.to_string())),
                (name, Some(_)) => inputs
                    .owner_address(name)
                    .is_none()
                    .then(|| MissingDependency::Account(name.to_string())),
            },
        };

        if let Some(dependency) = dependency {
            if !missing.contains(&dependency) {
                missing.push(dependency);
            }
        }
    }

    Readiness { missing }
}
