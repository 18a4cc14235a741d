//! Data exchanged between the host framework and real-time data submodules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Per-provider configuration as handed over by the host.
///
/// `params` stays untyped: each submodule validates its own parameters and
/// must be able to reject values of the wrong JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SubmoduleConfig {
    /// Registered submodule name this entry configures (e.g. "humansecurity")
    #[validate(length(min = 1))]
    pub name: String,

    /// Whether the host should hold the auction until the submodule signals done
    #[serde(default, alias = "waitForIt")]
    pub wait_for_it: bool,

    /// Submodule-specific parameters
    #[serde(default)]
    pub params: Option<Value>,
}

impl SubmoduleConfig {
    /// Build a config for `name` carrying the given params.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            name: name.into(),
            wait_for_it: false,
            params,
        }
    }
}

/// Consent signals the host collected for the page.
///
/// Passed through to submodules untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConsentData {
    pub gdpr: Option<Value>,
    pub usp: Option<String>,
    pub gpp: Option<Value>,
    #[serde(default)]
    pub coppa: bool,
}

/// `ortb2` metadata fragments for one auction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ortb2Fragments {
    /// Fragment merged into every bid request
    #[serde(default)]
    pub global: Map<String, Value>,
    /// Fragments scoped to a single bidder code
    #[serde(default)]
    pub bidder: HashMap<String, Map<String, Value>>,
}

/// Auction request state a submodule may enrich before bids go out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReqBidsConfig {
    /// Host-assigned auction id, when known
    pub auction_id: Option<String>,
    pub ortb2_fragments: Ortb2Fragments,
}

impl ReqBidsConfig {
    #[must_use]
    pub fn for_auction(auction_id: impl Into<String>) -> Self {
        Self {
            auction_id: Some(auction_id.into()),
            ortb2_fragments: Ortb2Fragments::default(),
        }
    }
}
