use std::rc::Rc;

use super::types::{ReqBidsConfig, SubmoduleConfig, UserConsentData};

/// Trait implemented by real-time data providers registered with the host.
pub trait RtdSubmodule {
    /// Name the host matches against `SubmoduleConfig::name`.
    fn name(&self) -> &'static str;

    /// Called once per page load. Returning `false` tells the host not to
    /// activate the submodule.
    fn init(&self, config: &SubmoduleConfig, user_consent: &UserConsentData) -> bool;

    /// Called once per auction. Implementations must invoke `callback`
    /// exactly once when they are done enriching `req_bids_config`.
    fn get_bid_request_data(
        &self,
        req_bids_config: &mut ReqBidsConfig,
        callback: Box<dyn FnOnce() + '_>,
        config: &SubmoduleConfig,
        user_consent: &UserConsentData,
    );
}

/// Host-side registration seam (`submodule(category, descriptor)`).
pub trait SubmoduleHook {
    fn submodule(&self, category: &str, module: Rc<dyn RtdSubmodule>);
}
