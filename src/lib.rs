//! pdakit - Typed instruction arguments and PDA derivation for Anchor IDLs
//!
//! Takes loosely typed user input (form strings, JSON) and turns it into
//! values matching an instruction's IDL argument types, then derives
//! program-derived addresses from the IDL's seed recipes.
//!
//! # Quick Start
//!
//! ```ignore
//! use pdakit::{convert_args, load_idl_from_file, SchemaContext};
//! use serde_json::json;
//!
//! let ctx = SchemaContext::new(load_idl_from_file("./target/idl/vault.json")?);
//! let ix = ctx.idl().instruction("deposit").unwrap();
//!
//! let args = json!({ "amount": "1000", "side": "bid" });
//! let values = convert_args(ix, args.as_object().unwrap(), &ctx)?;
//! ```
//!
//! # Deriving PDAs
//!
//! ```ignore
//! use pdakit::{DecoderUnavailable, DerivationInputs, Deriver, RpcAccountFetcher};
//!
//! let fetcher = RpcAccountFetcher::new(rpc_url, CommitmentConfig::confirmed());
//! let deriver = Deriver::new(&ctx, &fetcher, &DecoderUnavailable);
//!
//! let inputs = DerivationInputs::default()
//!     .with_arg("amount", json!(1000))
//!     .with_account("user", user_pubkey);
//! let vault = deriver.derive_account("deposit", "vault", &inputs).await?;
//! println!("{} (bump {})", vault.address, vault.bump);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod idl;
pub mod naming;
pub mod normalize;
pub mod pda;
pub mod schema;
pub mod value;

// Public re-exports for library users
pub use error::{PdakitError, PdakitResult};
pub use idl::{
    // Loading functions
    fetch_idl_from_chain,
    fetch_idl_from_url,
    get_idl_address,
    load_idl,
    load_idl_from_file,
    parse_idl_json,
    // Types
    Idl,
    IdlAccount,
    IdlAccountItem,
    IdlField,
    IdlInstruction,
    IdlPda,
    IdlSeed,
    IdlSource,
    IdlType,
    IdlTypeDef,
};
pub use normalize::{convert_args, to_seed_bytes, to_wire_value};
pub use pda::{
    check_readiness, plan_derivations, AccountDecoder, AccountFetcher, DecoderUnavailable,
    DerivationInputs, DerivedAddress, Deriver, FetchedAccount, Readiness, RpcAccountFetcher,
};
pub use schema::SchemaContext;
pub use value::{EnumPayload, WireInt, WireValue};
