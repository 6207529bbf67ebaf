use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant, SystemTime};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::ReloadGate;
use crate::error::Result;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches the companion script for saves and signals the session loop.
///
/// The watch is registered on the script's containing directory; only
/// events whose path matches the script exactly get through. Signals
/// travel over a single-slot channel, so a pending signal never stacks.
/// If the notification backend cannot start, falls back to polling the
/// script's mtime.
pub struct ScriptWatcher {
    backend: Backend,
    receiver: mpsc::Receiver<()>,
}

enum Backend {
    Notify(notify::RecommendedWatcher),
    Polling(PollingWatcher),
}

impl ScriptWatcher {
    pub fn start(script: PathBuf, gate: Arc<ReloadGate>, debounce: Duration) -> Result<Self> {
        let dir = script
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (tx, receiver) = mpsc::channel(1);
        let sink = Arc::new(EventSink {
            script,
            gate,
            debounce,
            last: Mutex::new(None),
            tx,
        });

        let backend = match Self::start_notify(&dir, Arc::clone(&sink)) {
            Ok(watcher) => Backend::Notify(watcher),
            Err(e) if dir.is_dir() => {
                tracing::warn!("file notifications unavailable ({e}), falling back to polling");
                Backend::Polling(PollingWatcher::start(sink, POLL_INTERVAL))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { backend, receiver })
    }

    fn start_notify(
        dir: &Path,
        sink: Arc<EventSink>,
    ) -> std::result::Result<notify::RecommendedWatcher, notify::Error> {
        let mut watcher =
            notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if sink.relevant(&event) {
                        sink.notify_saved();
                    }
                }
            })?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }

    /// Wait for the next save. None once the watcher is gone.
    pub async fn next_saved(&mut self) -> Option<()> {
        self.receiver.recv().await
    }

    /// Tear down the watch and release the underlying OS resource.
    pub fn stop(self) {
        match self.backend {
            Backend::Notify(watcher) => drop(watcher),
            Backend::Polling(poller) => poller.stop(),
        }
    }
}

/// Event filter and debounce shared by both backends
struct EventSink {
    script: PathBuf,
    gate: Arc<ReloadGate>,
    debounce: Duration,
    last: Mutex<Option<Instant>>,
    tx: mpsc::Sender<()>,
}

impl EventSink {
    /// Modify covers in-place writes; Create covers editors that save by
    /// renaming a temp file onto the target.
    fn relevant(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {
                event.paths.iter().any(|p| *p == self.script)
            }
            _ => false,
        }
    }

    fn notify_saved(&self) {
        if self.gate.is_reloading() {
            tracing::debug!("save ignored: reload in progress");
            return;
        }

        let now = Instant::now();
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if let Some(prev) = *last {
            if now.duration_since(prev) < self.debounce {
                tracing::trace!("save debounced");
                return;
            }
        }
        *last = Some(now);
        drop(last);

        // Full slot means a signal is already pending; coalesce.
        let _ = self.tx.try_send(());
    }
}

/// Fallback watcher comparing the script's mtime on an interval
struct PollingWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PollingWatcher {
    fn start(sink: Arc<EventSink>, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = std::thread::spawn(move || {
            let mut last_mtime: Option<SystemTime> = None;
            while flag.load(Ordering::Relaxed) {
                if let Ok(mtime) = std::fs::metadata(&sink.script).and_then(|m| m.modified()) {
                    match last_mtime {
                        Some(prev) if mtime > prev => {
                            last_mtime = Some(mtime);
                            sink.notify_saved();
                        }
                        // First sighting is a baseline, not a save
                        None => last_mtime = Some(mtime),
                        _ => {}
                    }
                }
                std::thread::sleep(interval);
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
