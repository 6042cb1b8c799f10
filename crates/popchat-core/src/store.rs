use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
};

use crate::{
    Error,
    config::Configuration,
    options::{StorageOptions, WriteMode},
};

enum WriteRequest {
    Save(Configuration),
    Flush(oneshot::Sender<()>),
}

enum Writer {
    Blocking,
    Background(mpsc::UnboundedSender<WriteRequest>),
}

/// Sole reader and writer of the configuration file.
///
/// Loading never fails: a missing, unreadable or malformed file yields the
/// defaults. Saving never fails either: every save is a complete overwrite
/// and write errors are logged and dropped.
pub struct ConfigStore {
    path: PathBuf,
    writer: Writer,
}

impl ConfigStore {
    /// A store that writes on the calling thread.
    pub fn blocking(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Writer::Blocking,
        }
    }

    /// A store whose saves are queued, in call order, to one writer task
    /// spawned on `handle`.
    pub fn background(path: impl Into<PathBuf>, handle: &Handle) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run_writer(path.clone(), rx));

        Self {
            path,
            writer: Writer::Background(tx),
        }
    }

    pub fn open(options: &StorageOptions, handle: &Handle) -> Result<Self, Error> {
        let path = options.location.resolve()?;
        tracing::info!("Configuration file: {:?}", path);

        Ok(match options.write_mode {
            WriteMode::Blocking => Self::blocking(path),
            WriteMode::Background => Self::background(path, handle),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Configuration {
        self.reconcile(fs::read_to_string(&self.path))
    }

    pub async fn load_async(&self) -> Configuration {
        self.reconcile(tokio::fs::read_to_string(&self.path).await)
    }

    pub fn save(&self, config: &Configuration) {
        match &self.writer {
            Writer::Blocking => {
                if let Err(e) = write_blocking(&self.path, config) {
                    tracing::error!("Failed to save configuration to {:?}: {}", self.path, e);
                }
            }
            Writer::Background(tx) => {
                if tx.send(WriteRequest::Save(config.clone())).is_err() {
                    tracing::error!("Configuration writer has stopped, dropping save");
                }
            }
        }
    }

    /// Wait until every save issued before this call has hit the disk.
    pub async fn flush(&self) {
        let Writer::Background(tx) = &self.writer else {
            return;
        };

        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(WriteRequest::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    fn reconcile(&self, read: io::Result<String>) -> Configuration {
        let content = match read {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No configuration at {:?}, using defaults", self.path);
                return Configuration::default();
            }
            Err(e) => {
                tracing::error!("Failed to read configuration {:?}: {}", self.path, e);
                return Configuration::default();
            }
        };

        Configuration::from_json_str(&content).unwrap_or_else(|e| {
            tracing::error!("Failed to parse configuration {:?}: {}", self.path, e);
            Configuration::default()
        })
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(config) => {
                if let Err(e) = write_async(&path, &config).await {
                    tracing::error!("Failed to save configuration to {:?}: {}", path, e);
                }
            }
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Configuration writer stopped");
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn write_blocking(path: &Path, config: &Configuration) -> Result<(), Error> {
    let content = config.to_json_string()?;
    if let Some(parent) = parent_dir(path) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

async fn write_async(path: &Path, config: &Configuration) -> Result<(), Error> {
    let content = config.to_json_string()?;
    if let Some(parent) = parent_dir(path) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}
