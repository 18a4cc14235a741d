//! Configuration commands.
//!
//! Configuration is loaded from TOML files and merged with environment variables
//! prefixed with `HUMANSECURITY_RTD__`. For example,
//! `HUMANSECURITY_RTD__REALTIME_DATA__AUCTION_DELAY_MS` overrides
//! `realtime_data.auction_delay_ms`.

use std::path::{Path, PathBuf};

use humansecurity_rtd_common::integrations::humansecurity::{
    read_config, HUMANSECURITY_SUBMODULE_NAME,
};
use humansecurity_rtd_common::rtd::SubmoduleConfig;
use humansecurity_rtd_common::settings::Settings;

use crate::error::CliError;

/// Load settings and return the `humansecurity` provider entry.
pub(crate) fn load_provider_config(file: &Path) -> Result<(Settings, SubmoduleConfig), CliError> {
    log::debug!("Loading config from: {}", file.display());

    let settings = Settings::from_file(file)?;
    let provider = settings
        .data_provider(HUMANSECURITY_SUBMODULE_NAME)
        .cloned()
        .ok_or_else(|| {
            CliError::Config(format!(
                "No '{}' entry in realtime_data.data_providers",
                HUMANSECURITY_SUBMODULE_NAME
            ))
        })?;

    Ok((settings, provider))
}

/// Validate settings and the submodule params they carry.
pub fn validate(file: PathBuf, verbose: bool) -> Result<(), CliError> {
    let (settings, provider) = load_provider_config(&file)?;
    let params = read_config(&provider)?;

    println!("Configuration is valid");
    println!("  File: {}", file.display());
    println!(
        "  Auction delay: {} ms",
        settings.realtime_data.auction_delay_ms
    );
    println!(
        "  Customer id: {}",
        params.customer_id.as_deref().unwrap_or("(none)")
    );
    match &params.bidders {
        Some(bidders) => println!("  Bidders: {}", bidders.join(", ")),
        None => println!("  Bidders: (global)"),
    }

    if verbose {
        println!("\nData providers:");
        for entry in &settings.realtime_data.data_providers {
            println!(
                "  - {}{}",
                entry.name,
                if entry.wait_for_it { " (wait for it)" } else { "" }
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        let file = write_config(
            r#"
            [realtime_data]
            auction_delay_ms = 200

            [[realtime_data.data_providers]]
            name = "humansecurity"
            params = { bidders = ["appnexus"] }
            "#,
        );

        assert!(validate(file.path().to_path_buf(), false).is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_params() {
        let file = write_config(
            r#"
            [realtime_data]

            [[realtime_data.data_providers]]
            name = "humansecurity"
            params = { bidders = [] }
            "#,
        );

        let err = validate(file.path().to_path_buf(), false).expect_err("should fail");
        assert!(err.to_string().contains("bidders must contain at least one entry"));
    }

    #[test]
    fn test_missing_provider_entry() {
        let file = write_config(
            r#"
            [realtime_data]

            [[realtime_data.data_providers]]
            name = "other"
            "#,
        );

        let err = load_provider_config(file.path()).expect_err("should fail");
        assert!(matches!(err, CliError::Config(_)));
    }
}
