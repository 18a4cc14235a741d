//! Page-side capabilities a submodule consumes: the hostname, the host
//! library's global object and handles exposed by injected scripts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Opaque reference to the host library's global object (e.g. `pbjs`).
///
/// Handed to injected scripts without being inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalApiRef {
    namespace: String,
}

impl GlobalApiRef {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Context passed to an injected script's `run` entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunContext {
    pub dependency_ref: GlobalApiRef,
}

/// Callback an injected script uses to push enrichment data back.
pub type EnrichmentCallback = Rc<dyn Fn(&Value)>;

/// Handle exposed by an injected script once it has executed.
pub trait ScriptApi {
    fn run(&self, context: ScriptRunContext, update: EnrichmentCallback);
}

/// Read access to the page a submodule runs in.
pub trait PageContext {
    /// Hostname of the current page location.
    fn hostname(&self) -> String;

    /// Reference to the host library's global object.
    fn global_api(&self) -> GlobalApiRef;

    /// Look up a handle an injected script published under `key`.
    ///
    /// `None` when nothing was published or it does not expose `run`.
    fn script_api(&self, key: &str) -> Option<Rc<dyn ScriptApi>>;
}

/// Fixed page description, used when the submodule runs outside a browser.
pub struct StaticPage {
    hostname: String,
    global_api: GlobalApiRef,
    script_apis: RefCell<HashMap<String, Rc<dyn ScriptApi>>>,
}

impl StaticPage {
    #[must_use]
    pub fn new(hostname: impl Into<String>, global_namespace: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            global_api: GlobalApiRef::new(global_namespace),
            script_apis: RefCell::new(HashMap::new()),
        }
    }

    /// Publish a script handle under `key`, as a loaded script would.
    pub fn expose(&self, key: impl Into<String>, api: Rc<dyn ScriptApi>) {
        self.script_apis.borrow_mut().insert(key.into(), api);
    }
}

impl fmt::Debug for StaticPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticPage")
            .field("hostname", &self.hostname)
            .field("global_api", &self.global_api)
            .field(
                "script_apis",
                &self.script_apis.borrow().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PageContext for StaticPage {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn global_api(&self) -> GlobalApiRef {
        self.global_api.clone()
    }

    fn script_api(&self, key: &str) -> Option<Rc<dyn ScriptApi>> {
        self.script_apis.borrow().get(key).cloned()
    }
}
