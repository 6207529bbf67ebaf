//! Live-reload plumbing: the Idle/Reloading gate, the file watcher, and
//! the clear-and-re-execute cycle

mod gate;
mod reloader;
mod watcher;

pub use gate::ReloadGate;
pub use reloader::Reloader;
pub use watcher::ScriptWatcher;
