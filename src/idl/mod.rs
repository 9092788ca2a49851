//! IDL loading and types
//!
//! IDLs are read from an on-chain IDL account, a file or a URL. Legacy
//! (pre-0.29) documents are converted to the current model on load.

mod fetcher;
mod legacy;
mod types;

pub use fetcher::*;
pub use types::*;
