//! HUMAN Security real-time data submodule.
//!
//! Injects HUMAN's anti-fraud script into the page and forwards the
//! enrichment data it reports into auction `ortb2` fragments, either globally
//! or for a configured set of bidders.
//!
//! # Configuration
//!
//! ```toml
//! [[realtime_data.data_providers]]
//! name = "humansecurity"
//! params = { customerId = "ABC123", bidders = ["appnexus"] }
//! ```
//!
//! Both params are optional. Without `bidders` the data lands in the global
//! fragment.
//!
//! # Flow
//!
//! 1. `init` validates params and asks the [`ScriptLoader`] for
//!    `https://sonar.script.ac/prebid/rtd.js?h=<hostname>[&c=<customerId>]`,
//!    tagging the element with `data-sid=<token>`.
//! 2. Once loaded, the script publishes `<token>_a`; its `run` receives the
//!    host global and [`HumanSecurityRtdProvider::update_enrichment_data`].
//! 3. Each auction gets `{ "ext": { "hmns": { … } } }` merged in.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use error_stack::Report;
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::constants::{RTD_MODULE_CATEGORY, SCRIPT_API_SUFFIX, SCRIPT_SID_ATTRIBUTE};
use crate::error::RtdError;
use crate::loader::{ScriptLoadRequest, ScriptLoader};
use crate::merge::merge_deep;
use crate::page::{EnrichmentCallback, PageContext, ScriptRunContext};
use crate::rtd::{ReqBidsConfig, RtdSubmodule, SubmoduleConfig, SubmoduleHook, UserConsentData};

pub const HUMANSECURITY_SUBMODULE_NAME: &str = "humansecurity";
pub const SCRIPT_URL: &str = "https://sonar.script.ac/prebid/rtd.js";
const LOG_PREFIX: &str = "[humansecurity RTD Submodule]:";
const ENRICHMENT_KEY: &str = "hmns";

/// Typed view of the submodule `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HumanSecurityParams {
    pub customer_id: Option<String>,
    pub bidders: Option<Vec<String>>,
}

impl HumanSecurityParams {
    /// Read whatever usable values `params` holds, without validating.
    fn from_params(params: Option<&Value>) -> Self {
        let Some(params) = params else {
            return Self::default();
        };
        let customer_id = params
            .get("customerId")
            .and_then(Value::as_str)
            .map(str::to_string);
        let bidders = params
            .get("bidders")
            .and_then(Value::as_array)
            .map(|codes| codes.iter().filter_map(bidder_code).collect());
        Self {
            customer_id,
            bidders,
        }
    }
}

/// Bidder code as the host would key it: numbers and booleans are
/// stringified, entries with no sensible key are skipped.
fn bidder_code(code: &Value) -> Option<String> {
    match code {
        Value::String(code) => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        Value::Bool(code) => Some(code.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn invalid(message: &str) -> Report<RtdError> {
    Report::new(RtdError::InvalidConfig {
        message: message.to_string(),
    })
}

fn present<'a>(params: &'a Value, key: &str) -> Option<&'a Value> {
    params.get(key).filter(|value| !value.is_null())
}

/// Validate the submodule config and return its typed params.
///
/// Missing `params` are valid. `null` values count as absent.
///
/// # Errors
///
/// Returns [`RtdError::InvalidConfig`] when `customerId` is not a string,
/// `bidders` is not an array, or `bidders` is empty, checked in that order.
pub fn read_config(config: &SubmoduleConfig) -> Result<HumanSecurityParams, Report<RtdError>> {
    let Some(params) = config.params.as_ref() else {
        return Ok(HumanSecurityParams::default());
    };

    if present(params, "customerId").is_some_and(|id| !id.is_string()) {
        return Err(invalid("customerId must be a string"));
    }

    if let Some(bidders) = present(params, "bidders") {
        let Some(bidders) = bidders.as_array() else {
            return Err(invalid("bidders must be an array"));
        };
        if bidders.is_empty() {
            return Err(invalid("bidders must contain at least one entry"));
        }
    }

    Ok(HumanSecurityParams::from_params(Some(params)))
}

/// Single slot holding the latest enrichment payload.
#[derive(Debug, Clone)]
pub struct EnrichmentStore {
    data: Rc<RefCell<Map<String, Value>>>,
}

impl Default for EnrichmentStore {
    fn default() -> Self {
        let mut data = Map::new();
        data.insert(ENRICHMENT_KEY.to_string(), Value::Object(Map::new()));
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }
}

impl EnrichmentStore {
    #[must_use]
    pub fn get(&self) -> Map<String, Value> {
        self.data.borrow().clone()
    }

    pub fn replace(&self, payload: Map<String, Value>) {
        *self.data.borrow_mut() = payload;
    }

    /// Accept `data.hmns` when it is an object, dropping everything else.
    pub fn update(&self, data: &Value) {
        let Some(Value::Object(hmns)) = data.get(ENRICHMENT_KEY) else {
            return;
        };
        let mut payload = Map::new();
        merge_deep(
            &mut payload,
            &Map::from_iter([(ENRICHMENT_KEY.to_string(), Value::Object(hmns.clone()))]),
        );
        self.replace(payload);
    }
}

fn generate_sid() -> String {
    Uuid::new_v4().to_string()
}

/// The HUMAN Security submodule bound to one page.
pub struct HumanSecurityRtdProvider {
    loader: Rc<dyn ScriptLoader>,
    page: Rc<dyn PageContext>,
    store: EnrichmentStore,
    sid_generator: fn() -> String,
}

impl HumanSecurityRtdProvider {
    #[must_use]
    pub fn new(loader: Rc<dyn ScriptLoader>, page: Rc<dyn PageContext>) -> Self {
        Self {
            loader,
            page,
            store: EnrichmentStore::default(),
            sid_generator: generate_sid,
        }
    }

    /// Replace the correlation token source.
    #[must_use]
    pub fn with_sid_generator(mut self, sid_generator: fn() -> String) -> Self {
        self.sid_generator = sid_generator;
        self
    }

    /// Current enrichment payload.
    #[must_use]
    pub fn enrichment_data(&self) -> Map<String, Value> {
        self.store.get()
    }

    /// Callback handed to the injected script.
    pub fn update_enrichment_data(&self, data: &Value) {
        self.store.update(data);
    }

    fn update_callback(&self) -> EnrichmentCallback {
        let store = self.store.clone();
        Rc::new(move |data: &Value| store.update(data))
    }

    /// Build the vendor script URL for the current page.
    ///
    /// Query values are form-encoded, so a space in `customerId` becomes `+`.
    #[must_use]
    pub fn script_url(&self, params: &HumanSecurityParams) -> String {
        let Ok(mut url) = Url::parse(SCRIPT_URL) else {
            log::warn!("{} failed to parse script URL, using it as-is", LOG_PREFIX);
            return SCRIPT_URL.to_string();
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("h", &self.page.hostname());
            if let Some(customer_id) = params.customer_id.as_deref().filter(|id| !id.is_empty()) {
                query.append_pair("c", customer_id);
            }
        }
        url.to_string()
    }

    /// Ask the loader for the vendor script under a fresh correlation token.
    pub fn inject_script(&self, params: &HumanSecurityParams) {
        let sid = (self.sid_generator)();
        let url = self.script_url(params);

        let page = Rc::clone(&self.page);
        let update = self.update_callback();
        let api_key = format!("{sid}{SCRIPT_API_SUFFIX}");
        let on_load = move || {
            if let Some(api) = page.script_api(&api_key) {
                api.run(
                    ScriptRunContext {
                        dependency_ref: page.global_api(),
                    },
                    update,
                );
            }
        };

        log::info!("{} loading script {} (sid {})", LOG_PREFIX, url, sid);
        self.loader.load(ScriptLoadRequest {
            url,
            module_name: HUMANSECURITY_SUBMODULE_NAME,
            on_load: Some(Box::new(on_load)),
            on_error: None,
            attributes: BTreeMap::from([(SCRIPT_SID_ATTRIBUTE.to_string(), sid)]),
        });
    }
}

impl RtdSubmodule for HumanSecurityRtdProvider {
    fn name(&self) -> &'static str {
        HUMANSECURITY_SUBMODULE_NAME
    }

    fn init(&self, config: &SubmoduleConfig, _user_consent: &UserConsentData) -> bool {
        match read_config(config) {
            Ok(params) => {
                self.inject_script(&params);
                true
            }
            Err(report) => {
                log::error!("{} {}", LOG_PREFIX, report.current_context().message());
                false
            }
        }
    }

    fn get_bid_request_data(
        &self,
        req_bids_config: &mut ReqBidsConfig,
        callback: Box<dyn FnOnce() + '_>,
        config: &SubmoduleConfig,
        _user_consent: &UserConsentData,
    ) {
        let fragment = Map::from_iter([("ext".to_string(), Value::Object(self.store.get()))]);
        let fragments = &mut req_bids_config.ortb2_fragments;

        match HumanSecurityParams::from_params(config.params.as_ref()).bidders {
            None => merge_deep(&mut fragments.global, &fragment),
            Some(bidders) => {
                for code in bidders {
                    merge_deep(fragments.bidder.entry(code).or_default(), &fragment);
                }
            }
        }

        log::debug!(
            "{} enriched auction {}",
            LOG_PREFIX,
            req_bids_config.auction_id.as_deref().unwrap_or("-")
        );
        callback();
    }
}

/// Register the submodule with the host under `realTimeData`.
pub fn register(hook: &dyn SubmoduleHook, provider: Rc<HumanSecurityRtdProvider>) {
    hook.submodule(RTD_MODULE_CATEGORY, provider);
}
