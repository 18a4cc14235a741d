//! Preview of the page a publisher would serve once the submodule initialised.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use humansecurity_rtd_common::integrations::humansecurity::{
    register, HumanSecurityRtdProvider, HUMANSECURITY_SUBMODULE_NAME,
};
use humansecurity_rtd_common::page::StaticPage;
use humansecurity_rtd_common::rtd::{RtdRegistry, RtdSubmodule, UserConsentData};
use humansecurity_rtd_common::script_injector::HtmlScriptInjector;

use crate::config::load_provider_config;
use crate::error::CliError;

/// Initialise the submodule against `page` and return the rewritten HTML.
pub fn render(
    file: PathBuf,
    page: PathBuf,
    hostname: String,
    global_namespace: String,
) -> Result<String, CliError> {
    let (_, provider_config) = load_provider_config(&file)?;
    let html = fs::read_to_string(&page)?;

    let injector = Rc::new(HtmlScriptInjector::new());
    let page_context = Rc::new(StaticPage::new(hostname, global_namespace));
    let provider = Rc::new(HumanSecurityRtdProvider::new(
        injector.clone(),
        page_context,
    ));

    let registry = RtdRegistry::new();
    register(&registry, provider.clone());

    if !provider.init(&provider_config, &UserConsentData::default()) {
        return Err(CliError::Init(format!(
            "'{}' refused to initialise, see log for details",
            HUMANSECURITY_SUBMODULE_NAME
        )));
    }

    let rewritten = injector.rewrite_html(&html)?;
    if injector.queued_count() > 0 {
        log::warn!(
            "{} had no <head> element, script was not injected",
            page.display()
        );
    }

    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write file");
        file
    }

    #[test]
    fn test_render_injects_script() {
        let config = temp_file(
            r#"
            [realtime_data]

            [[realtime_data.data_providers]]
            name = "humansecurity"
            params = { customerId = "ABC123" }
            "#,
        );
        let page = temp_file("<html><head></head><body></body></html>");

        let html = render(
            config.path().to_path_buf(),
            page.path().to_path_buf(),
            "example.com".to_string(),
            "pbjs".to_string(),
        )
        .expect("should render");

        assert!(html.contains(
            r#"src="https://sonar.script.ac/prebid/rtd.js?h=example.com&amp;c=ABC123""#
        ));
        assert!(html.contains("data-sid=\""));
    }

    #[test]
    fn test_render_refuses_invalid_params() {
        let config = temp_file(
            r#"
            [realtime_data]

            [[realtime_data.data_providers]]
            name = "humansecurity"
            params = { customerId = 123 }
            "#,
        );
        let page = temp_file("<html><head></head></html>");

        let err = render(
            config.path().to_path_buf(),
            page.path().to_path_buf(),
            "example.com".to_string(),
            "pbjs".to_string(),
        )
        .expect_err("should refuse");
        assert!(matches!(err, CliError::Init(_)));
    }
}
