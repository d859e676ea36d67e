mod consts;
mod logging;
mod settings;
mod store;

pub use logging::{init_logger, log_directory};
pub use settings::Settings;
pub use store::{FileSettingsStore, JsonFileSettingsStore, SettingsStore};
