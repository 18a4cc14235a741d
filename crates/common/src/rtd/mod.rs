//! Contract between the header-bidding host and its real-time data submodules.
//!
//! The host owns the auction lifecycle; submodules only see the config they
//! were registered with and the per-auction [`ReqBidsConfig`] they may enrich.

mod registry;
mod submodule;
mod types;

pub use registry::RtdRegistry;
pub use submodule::{RtdSubmodule, SubmoduleHook};
pub use types::{Ortb2Fragments, ReqBidsConfig, SubmoduleConfig, UserConsentData};
