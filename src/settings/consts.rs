pub const APP_QUALIFIER: &str = "dev";
pub const APP_ORGANIZATION: &str = "linebar";
pub const APP_NAME: &str = "linebar";

pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "linebar.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log target of the bar library; its per-update debug events stay off the console.
pub const CORE_LOG_TARGET: &str = "linebar";
pub const CORE_LOG_LEVEL: &str = "warn";
/// Log target of this binary. Listed explicitly since targets match by prefix.
pub const CLI_LOG_TARGET: &str = "linebar_cli";
