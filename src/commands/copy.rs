use anyhow::{Context, Result};
use linebar::{io::ProgressReader, ProgressTracker, Unit};
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
};
use tokio::task::block_in_place;
use tracing::info;

use crate::{cli::CopyArgs, ux::progress::terminal_bar, AppCtx};

/// Needs the multi-threaded runtime: the copy itself blocks.
pub async fn handle(args: CopyArgs, ctx: &AppCtx) -> Result<()> {
    let settings = ctx.settings_store.load()?;
    let options = args.display.apply(settings.display);

    let total = fs::metadata(&args.source)
        .with_context(|| format!("Failed to stat {}", args.source.display()))?
        .len();
    let input = File::open(&args.source)
        .with_context(|| format!("Failed to open {}", args.source.display()))?;
    let output = File::create(&args.destination)
        .with_context(|| format!("Failed to create {}", args.destination.display()))?;

    info!(
        "Copying {} to {} ...",
        args.source.display(),
        args.destination.display()
    );

    let mut bar = terminal_bar(total, options, Unit::Bytes)?;
    let buffer = (args.buffer_kib * 1024) as usize;
    let copied = block_in_place(|| copy_with_progress(input, output, buffer, &mut bar));
    bar.shutdown();
    let copied = copied?;

    info!(bytes = copied, "Copy complete ✅");
    Ok(())
}

/// Copies `input` into `output`, advancing `bar` by the bytes read.
///
/// The bar line is always terminated on return, also when the copy fails.
pub fn copy_with_progress<R, W, S>(
    input: R,
    output: W,
    buffer: usize,
    bar: &mut ProgressTracker<S>,
) -> Result<u64>
where
    R: Read,
    W: Write,
    S: Write,
{
    let result = {
        let mut reader = ProgressReader::new(BufReader::with_capacity(buffer, input), bar);
        let mut writer = BufWriter::with_capacity(buffer, output);
        io::copy(&mut reader, &mut writer)
            .context("Failed to copy file")
            .and_then(|copied| {
                writer.flush().context("Failed to flush destination")?;
                Ok(copied)
            })
    };

    match &result {
        // Nothing was read, so nothing was drawn yet.
        Ok(0) => bar.render(),
        Ok(_) => {}
        Err(_) => bar.end_line(),
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use linebar::{terminal::FixedWidth, DisplayOptions};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        cli::DisplayArgs,
        settings::{JsonFileSettingsStore, Settings, SettingsStore},
    };

    fn bar(total: u64) -> ProgressTracker<Vec<u8>> {
        ProgressTracker::builder(total)
            .unit(Unit::Bytes)
            .width_provider(Arc::new(FixedWidth(60)))
            .build(Vec::new())
            .unwrap()
    }

    /// Hands out `available` bytes, then fails.
    struct Interrupted {
        available: usize,
    }

    impl Read for Interrupted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.available == 0 {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone"));
            }
            let n = buf.len().min(self.available);
            buf[..n].fill(b'x');
            self.available -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_copy_advances_bar_to_total() {
        let data = vec![7u8; 5_000];
        let mut output = Vec::new();
        let mut bar = bar(data.len() as u64);

        let copied = copy_with_progress(data.as_slice(), &mut output, 1024, &mut bar).unwrap();

        assert_eq!(copied, 5_000);
        assert_eq!(output, data);
        assert_eq!(bar.current(), 5_000);
        assert!(bar.is_finished());
        let drawn = String::from_utf8_lossy(bar.sink()).into_owned();
        assert!(drawn.ends_with("   4.9 KB/   4.9 KB\n"));
    }

    #[test]
    fn test_empty_copy_still_draws() {
        let mut bar = bar(0);
        let copied = copy_with_progress(io::empty(), io::sink(), 64, &mut bar).unwrap();
        assert_eq!(copied, 0);
        assert!(String::from_utf8_lossy(bar.sink()).ends_with('\n'));
    }

    #[test]
    fn test_failed_copy_ends_the_line() {
        let mut bar = bar(10);
        let result = copy_with_progress(Interrupted { available: 4 }, io::sink(), 64, &mut bar);

        assert!(result.is_err());
        assert_eq!(bar.current(), 4);
        let drawn = String::from_utf8_lossy(bar.sink()).into_owned();
        assert!(drawn.contains("4 B/ 10 B"));
        assert!(drawn.ends_with('\n'));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_copy_command_with_settings_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.bin");
        let destination = dir.path().join("copy.bin");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&source, &data).unwrap();

        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
        store
            .save(&Settings {
                display: DisplayOptions::all(),
                unit: Unit::Raw,
                delay_ms: 0,
            })
            .unwrap();
        let ctx = AppCtx {
            settings_store: Box::new(store),
        };
        let args = CopyArgs {
            source,
            destination: destination.clone(),
            buffer_kib: 4,
            display: DisplayArgs::default(),
        };

        handle(args, &ctx).await.unwrap();
        assert_eq!(fs::read(destination).unwrap(), data);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_copy_command_missing_source() {
        let dir = tempdir().unwrap();
        let ctx = AppCtx {
            settings_store: Box::new(JsonFileSettingsStore::new(dir.path().join("s.json"))),
        };
        let args = CopyArgs {
            source: dir.path().join("absent"),
            destination: dir.path().join("copy"),
            buffer_kib: 4,
            display: DisplayArgs::default(),
        };

        let err = handle(args, &ctx).await.unwrap_err();
        assert!(err.to_string().contains("Failed to stat"));
        assert!(!dir.path().join("copy").exists());
    }
}
