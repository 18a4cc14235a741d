use std::cell::RefCell;
use std::rc::Rc;

use super::submodule::{RtdSubmodule, SubmoduleHook};

struct RegisteredSubmodule {
    category: String,
    module: Rc<dyn RtdSubmodule>,
}

/// In-memory collection of submodules registered through [`SubmoduleHook`].
///
/// Stands in for the host's registry when the submodule runs outside the
/// browser, e.g. in the CLI or in tests.
#[derive(Default)]
pub struct RtdRegistry {
    submodules: RefCell<Vec<RegisteredSubmodule>>,
}

impl RtdRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a submodule by category and name.
    #[must_use]
    pub fn find(&self, category: &str, name: &str) -> Option<Rc<dyn RtdSubmodule>> {
        self.submodules
            .borrow()
            .iter()
            .find(|entry| entry.category == category && entry.module.name() == name)
            .map(|entry| Rc::clone(&entry.module))
    }

    /// All submodules registered under `category`, in registration order.
    #[must_use]
    pub fn submodules(&self, category: &str) -> Vec<Rc<dyn RtdSubmodule>> {
        self.submodules
            .borrow()
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| Rc::clone(&entry.module))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.submodules.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submodules.borrow().is_empty()
    }
}

impl SubmoduleHook for RtdRegistry {
    fn submodule(&self, category: &str, module: Rc<dyn RtdSubmodule>) {
        log::info!(
            "Registering submodule '{}' under '{}'",
            module.name(),
            category
        );
        self.submodules.borrow_mut().push(RegisteredSubmodule {
            category: category.to_string(),
            module,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtd::{ReqBidsConfig, SubmoduleConfig, UserConsentData};

    struct NoopSubmodule(&'static str);

    impl RtdSubmodule for NoopSubmodule {
        fn name(&self) -> &'static str {
            self.0
        }

        fn init(&self, _config: &SubmoduleConfig, _user_consent: &UserConsentData) -> bool {
            true
        }

        fn get_bid_request_data(
            &self,
            _req_bids_config: &mut ReqBidsConfig,
            callback: Box<dyn FnOnce() + '_>,
            _config: &SubmoduleConfig,
            _user_consent: &UserConsentData,
        ) {
            callback();
        }
    }

    #[test]
    fn finds_registered_submodule_by_category_and_name() {
        let registry = RtdRegistry::new();
        registry.submodule("realTimeData", Rc::new(NoopSubmodule("first")));
        registry.submodule("userId", Rc::new(NoopSubmodule("second")));

        assert_eq!(registry.len(), 2);
        assert!(registry.find("realTimeData", "first").is_some());
        assert!(registry.find("realTimeData", "second").is_none());
        assert_eq!(registry.submodules("userId").len(), 1);
    }

    #[test]
    fn empty_registry() {
        let registry = RtdRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find("realTimeData", "anything").is_none());
    }
}
