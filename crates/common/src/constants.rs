/// Host module category every real-time data provider registers under.
pub const RTD_MODULE_CATEGORY: &str = "realTimeData";

/// Attribute carrying the correlation token on injected script elements.
pub const SCRIPT_SID_ATTRIBUTE: &str = "data-sid";

/// Suffix appended to the correlation token to name the script's API handle.
pub const SCRIPT_API_SUFFIX: &str = "_a";

/// Environment prefix for settings overrides, e.g.
/// `HUMANSECURITY_RTD__REALTIME_DATA__AUCTION_DELAY_MS`.
pub const SETTINGS_ENV_PREFIX: &str = "HUMANSECURITY_RTD";
