//! CLI command definitions using clap

use crate::error::{PdakitError, PdakitResult};
use crate::idl::IdlSource;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

/// pdakit - Convert instruction args and derive PDAs from Anchor IDLs
#[derive(Debug, Parser)]
#[command(name = "pdakit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// RPC URL (overrides config)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Load IDL from file path or URL
    /// Accepts: local file path (./idl.json) or URL (https://...)
    #[arg(short, long, global = true)]
    pub idl: Option<String>,

    /// Fetch the IDL from this program's on-chain IDL account
    #[arg(short, long, global = true)]
    pub program: Option<String>,

    /// Log derivation steps (same as RUST_LOG=pdakit=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert instruction arguments to their typed wire form
    Convert {
        /// Instruction name
        instruction: String,

        /// Argument values as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Derive PDA accounts of an instruction
    Derive {
        /// Instruction name
        instruction: String,

        /// Account to derive; all PDA accounts when omitted
        account: Option<String>,

        /// Argument values as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        /// Known accounts as a JSON object of name to base58 address
        #[arg(long, default_value = "{}")]
        accounts: String,

        /// Prompt for arguments that are still missing
        #[arg(long)]
        interactive: bool,
    },

    /// Report which inputs a PDA account still needs
    Check {
        /// Instruction name
        instruction: String,

        /// Account to check; all PDA accounts when omitted
        account: Option<String>,

        /// Argument values as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        /// Known accounts as a JSON object of name to base58 address
        #[arg(long, default_value = "{}")]
        accounts: String,
    },

    /// Show the seed recipes of an instruction's PDA accounts
    Seeds {
        /// Instruction name
        instruction: String,
    },

    /// Manage pdakit configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration values
    Set {
        /// RPC URL to use
        #[arg(long)]
        url: Option<String>,

        /// Commitment for account reads (processed, confirmed, finalized)
        #[arg(long)]
        commitment: Option<String>,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Determine the IDL source from --idl or --program
    pub fn idl_source(&self) -> PdakitResult<IdlSource> {
        match (&self.idl, &self.program) {
            (Some(location), _) => Ok(IdlSource::from_location(location)),
            (None, Some(program)) => Pubkey::from_str(program)
                .map(IdlSource::OnChain)
                .map_err(|_| PdakitError::InvalidProgramId(program.clone())),
            (None, None) => Err(PdakitError::ConfigError(
                "no IDL given, use --idl <path|url> or --program <id>".into(),
            )),
        }
    }
}

/// Parse the `--args` JSON object
pub fn parse_args_json(text: &str) -> PdakitResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(PdakitError::mismatch(format!(
            "--args must be a JSON object, got {}",
            other
        ))),
    }
}

/// Parse the `--accounts` JSON object; `null` entries mark accounts without an address
pub fn parse_accounts_json(text: &str) -> PdakitResult<HashMap<String, Option<Pubkey>>> {
    let map = match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => map,
        other => {
            return Err(PdakitError::mismatch(format!(
                "--accounts must be a JSON object, got {}",
                other
            )))
        }
    };

    map.into_iter()
        .map(|(name, value)| {
            let address = match &value {
                Value::Null => None,
                Value::String(text) => Some(Pubkey::from_str(text.trim()).map_err(|_| {
                    PdakitError::mismatch(format!("'{}' is not a valid address", text)).at(&name)
                })?),
                other => {
                    return Err(PdakitError::mismatch(format!(
                        "expected a base58 address, got {}",
                        other
                    ))
                    .at(&name))
                }
            };
            Ok((name, address))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idl_source() {
        let cli = Cli::parse_from(["pdakit", "--idl", "https://x.dev/idl.json", "seeds", "init"]);
        assert_eq!(
            cli.idl_source().unwrap(),
            IdlSource::Url("https://x.dev/idl.json".into())
        );

        let cli = Cli::parse_from(["pdakit", "seeds", "init", "--program", "bad"]);
        assert!(matches!(
            cli.idl_source(),
            Err(PdakitError::InvalidProgramId(_))
        ));

        let cli = Cli::parse_from(["pdakit", "seeds", "init"]);
        assert!(cli.idl_source().is_err());
    }

    #[test]
    fn test_derive_flags() {
        let cli = Cli::parse_from([
            "pdakit",
            "derive",
            "deposit",
            "vault",
            "--args",
            r#"{"amount": 5}"#,
            "--interactive",
        ]);
        let Commands::Derive {
            account,
            args,
            accounts,
            interactive,
            ..
        } = cli.command
        else {
            panic!("expected derive");
        };
        assert_eq!(account.as_deref(), Some("vault"));
        assert_eq!(args, r#"{"amount": 5}"#);
        assert_eq!(accounts, "{}");
        assert!(interactive);
    }

    #[test]
    fn test_parse_accounts_json() {
        let key = Pubkey::new_unique();
        let accounts =
            parse_accounts_json(&format!(r#"{{"user": "{}", "pool": null}}"#, key)).unwrap();
        assert_eq!(accounts["user"], Some(key));
        assert_eq!(accounts["pool"], None);

        let err = parse_accounts_json(r#"{"user": "nope"}"#).unwrap_err();
        assert_eq!(err.path(), Some("user"));

        assert!(parse_accounts_json("[]").is_err());
        assert!(parse_args_json("5").is_err());
        assert_eq!(parse_args_json(r#"{"a": 1}"#).unwrap().len(), 1);
    }
}
