//! AutoSplit Ledger Crate
//!
//! The ledger engine: computes assignment shares from item selections,
//! commits validated assignment saves (one transaction and one ledger
//! version bump per save, serialized per group), and reads snapshot
//! settlement summaries.

pub mod errors;
mod locks;
pub mod service;
pub mod split;
pub mod types;

pub use errors::{LedgerError, LedgerResult};
pub use service::LedgerService;
pub use split::{compute_shares, split_evenly};
pub use types::{AssignmentInput, ItemSelection, MemberTotal, Summary};
