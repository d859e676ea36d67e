use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde_json::{from_str, to_string_pretty};
use std::{fs, io::ErrorKind, path::PathBuf};
use tracing::debug;

use crate::settings::{
    consts::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, SETTINGS_FILE},
    Settings,
};

pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

pub struct FileSettingsStore {
    directory: PathBuf, // platform config directory (from ProjectDirs)
    file: &'static str, // "settings.json"
}

impl FileSettingsStore {
    /// Build from ProjectDirs config directory:
    ///   - Windows:   %APPDATA%\<qualifier>\<org>\<app>\settings.json
    ///   - macOS:     ~/Library/Application Support/<app>/settings.json
    ///   - Linux:     ~/.config/<app>/settings.json
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or_else(|| anyhow!("Could not determine project directories"))?;

        Ok(Self::in_directory(project_dirs.config_dir().to_path_buf()))
    }

    pub fn in_directory(directory: PathBuf) -> Self {
        Self {
            directory,
            file: SETTINGS_FILE,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file)
    }
}

impl SettingsStore for FileSettingsStore {
    /// Creates the file with defaults on first use.
    fn load(&self) -> Result<Settings> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "Failed to create settings directory: {}",
                self.directory.display()
            )
        })?;
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, writing defaults");
                let defaults = Settings::default();
                self.save(&defaults)?;
                return Ok(defaults);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))
            }
        };
        from_str(&content)
            .with_context(|| format!("Failed to deserialize settings: {}", path.display()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "Failed to create settings directory: {}",
                self.directory.display()
            )
        })?;
        fs::write(self.path(), to_string_pretty(settings)?)
            .with_context(|| format!("Failed to persist settings file: {}", self.path().display()))
    }
}

/// Settings kept in a file chosen on the command line.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for JsonFileSettingsStore {
    /// A missing file reads as defaults and is not created.
    fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read settings file: {}", self.path.display())
                })
            }
        };
        from_str(&content)
            .with_context(|| format!("Failed to deserialize settings: {}", self.path.display()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        fs::write(&self.path, to_string_pretty(settings)?)
            .with_context(|| format!("Failed to persist settings file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use linebar::{DisplayOptions, Unit};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_store_creates_defaults() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::in_directory(dir.path().join("nested"));

        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_keeps_unreadable_file() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::in_directory(dir.path().to_path_buf());
        let bytes = b"{\"unit\":\"raw\",\"delayMs\":20,\"note\":\"\xff\"}".to_vec();
        fs::write(store.path(), &bytes).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
        assert_eq!(fs::read(store.path()).unwrap(), bytes);
    }

    #[test]
    fn test_file_store_reads_saved_values() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::in_directory(dir.path().to_path_buf());
        fs::write(store.path(), r#"{"unit":"raw","delayMs":20}"#).unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.unit, Unit::Raw);
        assert_eq!(settings.delay_ms, 20);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("custom.json"));
        assert_eq!(store.load().unwrap(), Settings::default());

        let settings = Settings {
            display: DisplayOptions::none().with_percent(true),
            unit: Unit::Raw,
            delay_ms: 20,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileSettingsStore::new(path);
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize settings"));
    }
}
