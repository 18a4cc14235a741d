//! External script loading capability.

use std::collections::BTreeMap;
use std::fmt;

/// Handler run when a requested script finishes loading or fails to.
pub type LoadHandler = Box<dyn FnOnce()>;

/// One request to fetch and execute a remote script.
pub struct ScriptLoadRequest {
    /// Fully built script URL
    pub url: String,
    /// Name of the submodule asking for the script
    pub module_name: &'static str,
    /// Run once the script has executed
    pub on_load: Option<LoadHandler>,
    /// Run if the script could not be loaded
    pub on_error: Option<LoadHandler>,
    /// Attributes set on the script element
    pub attributes: BTreeMap<String, String>,
}

impl fmt::Debug for ScriptLoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptLoadRequest")
            .field("url", &self.url)
            .field("module_name", &self.module_name)
            .field("on_load", &self.on_load.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Asynchronous, fire-and-forget script loader provided by the host.
pub trait ScriptLoader {
    fn load(&self, request: ScriptLoadRequest);
}
