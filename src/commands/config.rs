use anyhow::{Context, Result};
use serde_json::to_string_pretty;
use tracing::info;

use crate::{cli::ConfigArgs, settings::log_directory, AppCtx};

pub async fn handle(args: ConfigArgs, ctx: &AppCtx) -> Result<()> {
    let mut settings = ctx.settings_store.load()?;
    settings.display = args.display.apply(settings.display);
    if let Some(unit) = args.unit {
        settings.unit = unit;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.delay_ms = delay_ms;
    }

    ctx.settings_store.save(&settings)?;
    info!("Configuration saved successfully ✅");

    if args.show {
        println!(
            "{}",
            to_string_pretty(&settings).context("Failed to serialize settings")?
        );
        info!("Logs are written to {}", log_directory()?.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use linebar::{DisplayOptions, Unit};

    use super::*;
    use crate::{
        cli::DisplayArgs,
        settings::{Settings, SettingsStore},
    };

    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<Settings>>,
    }

    impl SettingsStore for MemoryStore {
        fn load(&self) -> Result<Settings> {
            Ok((*self.saved.borrow()).unwrap_or_default())
        }

        fn save(&self, settings: &Settings) -> Result<()> {
            *self.saved.borrow_mut() = Some(*settings);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_config_merges_overrides() {
        let ctx = AppCtx {
            settings_store: Box::new(MemoryStore::default()),
        };
        let args = ConfigArgs {
            unit: Some(Unit::Raw),
            delay_ms: None,
            show: false,
            display: DisplayArgs {
                speed: Some(false),
                ..Default::default()
            },
        };

        handle(args, &ctx).await.unwrap();

        let saved = ctx.settings_store.load().unwrap();
        assert_eq!(saved.unit, Unit::Raw);
        assert_eq!(saved.delay_ms, Settings::default().delay_ms);
        assert_eq!(saved.display, DisplayOptions::all().with_speed(false));
    }
}
