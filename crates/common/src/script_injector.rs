//! Script element injection for server-rendered pages.
//!
//! [`HtmlScriptInjector`] is a [`ScriptLoader`] that queues load requests and
//! writes them into the `<head>` of the next HTML document it rewrites. Uses
//! `lol_html` for streaming HTML processing. Once injected, a request's
//! handlers wait under its `data-sid` until the page reports the element's
//! load or error event.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use error_stack::{Report, ResultExt};
use lol_html::{element, html_content::ContentType, HtmlRewriter, Settings as RewriterSettings};

use crate::constants::SCRIPT_SID_ATTRIBUTE;
use crate::error::RtdError;
use crate::loader::{LoadHandler, ScriptLoadRequest, ScriptLoader};

struct PendingHandlers {
    module_name: &'static str,
    on_load: Option<LoadHandler>,
    on_error: Option<LoadHandler>,
}

/// Loader that renders queued requests as `<script async>` elements.
#[derive(Default)]
pub struct HtmlScriptInjector {
    queued: RefCell<Vec<ScriptLoadRequest>>,
    pending: RefCell<HashMap<String, PendingHandlers>>,
}

impl HtmlScriptInjector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting for a document to be injected into.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queued.borrow().len()
    }

    /// Number of injected scripts whose load has not been reported yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Inject every queued script into the first `<head>` of `html`.
    ///
    /// Documents without a `<head>` come back unchanged and the requests stay
    /// queued for the next document.
    ///
    /// # Errors
    ///
    /// Returns [`RtdError::Html`] if the rewriter rejects the document or the
    /// output is not valid UTF-8.
    pub fn rewrite_html(&self, html: &str) -> Result<String, Report<RtdError>> {
        if self.queued.borrow().is_empty() {
            return Ok(html.to_string());
        }

        let markup: String = self
            .queued
            .borrow()
            .iter()
            .map(render_script_tag)
            .collect();
        let injected = Rc::new(Cell::new(false));
        let injected_in_head = Rc::clone(&injected);

        let mut output = Vec::with_capacity(html.len() + markup.len());
        let rewriter_settings = RewriterSettings {
            element_content_handlers: vec![element!("head", move |el| {
                if !injected_in_head.get() {
                    el.append(&markup, ContentType::Html);
                    injected_in_head.set(true);
                }
                Ok(())
            })],
            ..RewriterSettings::default()
        };

        let mut rewriter =
            HtmlRewriter::new(rewriter_settings, |chunk: &[u8]| output.extend_from_slice(chunk));
        rewriter
            .write(html.as_bytes())
            .change_context(RtdError::Html {
                message: "Failed to rewrite HTML document".to_string(),
            })?;
        rewriter.end().change_context(RtdError::Html {
            message: "Failed to finish HTML document".to_string(),
        })?;

        let rewritten = String::from_utf8(output).change_context(RtdError::Html {
            message: "Rewritten HTML is not valid UTF-8".to_string(),
        })?;

        if injected.get() {
            self.mark_injected();
        } else {
            log::debug!("No <head> element found, keeping scripts queued");
        }

        Ok(rewritten)
    }

    /// Report that the script tagged with `sid` finished loading.
    ///
    /// Returns `false` if no injected script carries that id.
    pub fn notify_loaded(&self, sid: &str) -> bool {
        let Some(handlers) = self.pending.borrow_mut().remove(sid) else {
            log::debug!("Load reported for unknown script sid {}", sid);
            return false;
        };
        log::debug!("Script for '{}' loaded (sid {})", handlers.module_name, sid);
        if let Some(on_load) = handlers.on_load {
            on_load();
        }
        true
    }

    /// Report that the script tagged with `sid` failed to load.
    ///
    /// Returns `false` if no injected script carries that id.
    pub fn notify_failed(&self, sid: &str) -> bool {
        let Some(handlers) = self.pending.borrow_mut().remove(sid) else {
            return false;
        };
        log::warn!(
            "Script for '{}' failed to load (sid {})",
            handlers.module_name,
            sid
        );
        if let Some(on_error) = handlers.on_error {
            on_error();
        }
        true
    }

    fn mark_injected(&self) {
        let injected: Vec<ScriptLoadRequest> = self.queued.borrow_mut().drain(..).collect();
        let mut pending = self.pending.borrow_mut();
        for request in injected {
            log::info!(
                "Injected script for '{}': {}",
                request.module_name,
                request.url
            );
            let key = request
                .attributes
                .get(SCRIPT_SID_ATTRIBUTE)
                .cloned()
                .unwrap_or_else(|| request.url.clone());
            pending.insert(
                key,
                PendingHandlers {
                    module_name: request.module_name,
                    on_load: request.on_load,
                    on_error: request.on_error,
                },
            );
        }
    }
}

impl ScriptLoader for HtmlScriptInjector {
    fn load(&self, request: ScriptLoadRequest) {
        log::debug!(
            "Queued script for '{}': {}",
            request.module_name,
            request.url
        );
        self.queued.borrow_mut().push(request);
    }
}

fn render_script_tag(request: &ScriptLoadRequest) -> String {
    format!(
        r#"<script async src="{}"{}></script>"#,
        escape_attribute(&request.url),
        render_attributes(&request.attributes)
    )
}

fn render_attributes(attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .map(|(name, value)| format!(r#" {}="{}""#, name, escape_attribute(value)))
        .collect()
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
