// src/logging.rs
//! Human-readable logs on stderr from the first line, plus an optional JSON
//! log file attached once the configuration naming it has been read.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

type FileLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Swaps the JSON file layer in after the subscriber is installed.
pub type FileLayerHandle = reload::Handle<Option<FileLayer>, Registry>;

/// Stderr subscriber with an empty slot for the file layer.
pub fn subscriber(filter: EnvFilter) -> (impl Subscriber + Send + Sync, FileLayerHandle) {
    let (file_slot, handle) = reload::Layer::new(None::<FileLayer>);
    let subscriber = tracing_subscriber::registry()
        .with(file_slot)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter);
    (subscriber, handle)
}

fn json_file_layer(path: &Path) -> Result<FileLayer> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    Ok(fmt::layer()
        .json()
        .with_writer(Mutex::new(file))
        .with_current_span(false)
        .with_span_list(false)
        .boxed())
}

pub fn attach_log_file(handle: &FileLayerHandle, path: &Path) -> Result<()> {
    let layer = json_file_layer(path)?;
    handle
        .reload(Some(layer))
        .with_context(|| format!("Failed to attach log file {}", path.display()))
}
