use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

// -------- rotating writer for the log file --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

fn rotating_writer(path: &Path, config: &LoggingConfig) -> Result<RotWriter> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log dir {}", dir.display()))?;
    }
    let max_backups = config.max_backups.unwrap_or(3);
    let max_bytes = config.max_size_mb.unwrap_or(100).saturating_mul(1024 * 1024) as usize;
    let rotate = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
        ContentLimit::Bytes(max_bytes),
        Compression::None,
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rotate))))
}

/// Initialize tracing: console output at `console_level`, plus an optional
/// rotating file sink at `file_level`. Relative file paths resolve against
/// `home_dir`. Safe to call once per process.
pub fn init_logging(config: &LoggingConfig, home_dir: &Path) -> Result<()> {
    // Route log-crate records from dependencies through tracing.
    let _ = tracing_log::LogTracer::init();

    let console_level = parse_tracing_level(&config.console_level);
    let console_layer = console_level.map(|level| {
        fmt::layer()
            .with_target(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level))
    });

    let file_layer = match (&config.file, parse_tracing_level(&config.file_level)) {
        (Some(file), Some(level)) => {
            let path = {
                let p = PathBuf::from(file);
                if p.is_absolute() {
                    p
                } else {
                    home_dir.join(p)
                }
            };
            let writer = rotating_writer(&path, config)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer)
                    .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level)),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("tracing subscriber already initialized")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_accepts_known_names() {
        assert_eq!(parse_tracing_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("off"), None);
        // unknown strings fall back to info rather than failing startup
        assert_eq!(parse_tracing_level("verbose"), Some(Level::INFO));
    }
}
