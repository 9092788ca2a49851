//! Program-derived address resolution
//!
//! Turns an IDL seed recipe plus the caller's argument values and known
//! accounts into an address, fetching account data where a seed reads a
//! field of another account.

mod engine;
mod inputs;
mod plan;
mod readiness;
mod rpc;

pub use engine::*;
pub use inputs::*;
pub use plan::*;
pub use readiness::*;
pub use rpc::*;
