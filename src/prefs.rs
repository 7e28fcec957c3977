use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use std::thread;

use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};

use crate::error::{PrefsError, Result};

pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, namespace: &str, key: &str) -> Option<String>;

    fn put_string(&self, namespace: &str, key: &str, value: &str) -> PendingWrite;

    fn get_string_or(&self, namespace: &str, key: &str, default: &str) -> String {
        self.get_string(namespace, key)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Completion of a background commit.
///
/// Dropping it is the normal fire-and-forget path.
pub struct PendingWrite {
    rx: Option<oneshot::Receiver<Result<()>>>,
}

impl PendingWrite {
    pub fn done() -> Self {
        Self { rx: None }
    }

    fn failed(err: PrefsError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self::from_receiver(rx)
    }

    fn from_receiver(rx: oneshot::Receiver<Result<()>>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Blocks until the write is on disk. Must not be called from inside an
    /// async runtime; await the handle there instead.
    pub fn wait(self) -> Result<()> {
        match self.rx {
            None => Ok(()),
            Some(rx) => rx.blocking_recv().unwrap_or(Err(PrefsError::WriterGone)),
        }
    }
}

impl Future for PendingWrite {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.as_mut() {
            None => Poll::Ready(Ok(())),
            Some(rx) => Pin::new(rx)
                .poll(cx)
                .map(|res| res.unwrap_or(Err(PrefsError::WriterGone))),
        }
    }
}

type Namespace = Map<String, Value>;

/// Volatile store for tests and runs without a writable config directory.
#[derive(Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, Namespace>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get_string(&self, namespace: &str, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(namespace)?.get(key)?.as_str().map(str::to_string)
    }

    fn put_string(&self, namespace: &str, key: &str, value: &str) -> PendingWrite {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), Value::String(value.to_string()));
        PendingWrite::done()
    }
}

struct WriteJob {
    path: PathBuf,
    namespace: String,
    snapshot: Namespace,
    reply: oneshot::Sender<Result<()>>,
}

/// In-memory view of one namespace file.
#[derive(Default)]
struct Cached {
    entries: Namespace,
    /// False while the file could not be read; writes stay in memory until it can.
    on_disk: bool,
}

/// One JSON file per namespace under a single directory.
///
/// Reads always see the latest `put_string`. Keys this store does not
/// understand, including non-string values, are carried through every commit.
pub struct JsonPrefs {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Cached>>,
    writer: mpsc::UnboundedSender<WriteJob>,
}

impl JsonPrefs {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let (tx, rx) = mpsc::unbounded_channel();
        if let Err(e) = thread::Builder::new()
            .name("prefs-writer".to_string())
            .spawn(move || run_writer(rx))
        {
            tracing::error!("failed to start preferences writer: {}", e);
        }

        tracing::debug!(dir = %dir.display(), "opened preferences");
        Self {
            dir,
            cache: Mutex::new(HashMap::new()),
            writer: tx,
        }
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }

    fn load_namespace(&self, namespace: &str) -> Result<Namespace> {
        let path = self.namespace_path(namespace);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Namespace::new()),
            Err(source) => return Err(PrefsError::Read { path, source }),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "ignoring preferences that are not a JSON object");
                Ok(Namespace::new())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring malformed preferences: {}", e);
                Ok(Namespace::new())
            }
        }
    }

    /// Loads the namespace on first use, and retries the file until a read
    /// succeeds. Values written in memory meanwhile win over the file.
    fn with_namespace<T>(&self, namespace: &str, f: impl FnOnce(&mut Cached) -> T) -> T {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let cached = cache.entry(namespace.to_string()).or_default();
        if !cached.on_disk {
            match self.load_namespace(namespace) {
                Ok(mut entries) => {
                    entries.extend(std::mem::take(&mut cached.entries));
                    cached.entries = entries;
                    cached.on_disk = true;
                }
                Err(e) => tracing::warn!("failed to read preferences: {}", e),
            }
        }
        f(cached)
    }
}

impl PreferenceStore for JsonPrefs {
    fn get_string(&self, namespace: &str, key: &str) -> Option<String> {
        self.with_namespace(namespace, |cached| {
            cached.entries.get(key)?.as_str().map(str::to_string)
        })
    }

    fn put_string(&self, namespace: &str, key: &str, value: &str) -> PendingWrite {
        // Snapshot and enqueue under the cache lock so commits land in write order.
        self.with_namespace(namespace, |cached| {
            cached
                .entries
                .insert(key.to_string(), Value::String(value.to_string()));
            let path = self.namespace_path(namespace);
            if !cached.on_disk {
                tracing::warn!(namespace, key, "preferences file unreadable, change kept in memory");
                return PendingWrite::failed(PrefsError::Unreadable { path });
            }

            let (reply, rx) = oneshot::channel();
            let job = WriteJob {
                path,
                namespace: namespace.to_string(),
                snapshot: cached.entries.clone(),
                reply,
            };
            if self.writer.send(job).is_err() {
                tracing::warn!(namespace, key, "preferences writer unavailable, change kept in memory");
            }
            PendingWrite::from_receiver(rx)
        })
    }
}

fn run_writer(mut rx: mpsc::UnboundedReceiver<WriteJob>) {
    while let Some(job) = rx.blocking_recv() {
        let result = commit(&job.path, &job.namespace, &job.snapshot);
        if let Err(e) = &result {
            tracing::warn!("preferences commit failed: {}", e);
        } else {
            tracing::trace!(path = %job.path.display(), "preferences committed");
        }
        let _ = job.reply.send(result);
    }
}

fn commit(path: &Path, namespace: &str, snapshot: &Namespace) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PrefsError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(snapshot).map_err(|source| PrefsError::Serialize {
        namespace: namespace.to_string(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|source| PrefsError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| PrefsError::Write {
        path: path.to_path_buf(),
        source,
    })
}
