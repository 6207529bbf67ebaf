//! One macro invocation: scaffold the script, open the editor, watch for
//! saves, reload until the user stops the session

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{ConfigEngine, Settings};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::launcher;
use crate::reload::{ReloadGate, Reloader, ScriptWatcher};
use crate::scaffold;
use crate::scripting::ScriptEngine;

#[derive(Debug)]
pub struct Session {
    document: Arc<RwLock<Document>>,
    settings: Settings,
    script: PathBuf,
}

impl Session {
    /// Open the document and derive the companion script path. Fails
    /// before any side effect when the document has never been saved.
    pub fn open(doc_path: PathBuf) -> Result<Self> {
        if !doc_path.is_file() {
            return Err(Error::Precondition(format!(
                "{} does not exist; save the document first",
                doc_path.display()
            )));
        }
        // Watch events report absolute paths, so match against one
        let doc_path = doc_path.canonicalize()?;

        let mut config = ConfigEngine::new();
        if let Err(e) = config.load_default() {
            warn!("{e}; continuing with defaults");
        }
        let settings = config.settings();

        let document = Document::open(&doc_path)?;
        let script = scaffold::script_path(&doc_path, &settings);

        Ok(Self {
            document: Arc::new(RwLock::new(document)),
            settings,
            script,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if scaffold::write_if_absent(&self.script)? {
            info!("created {}", self.script.display());
        }

        // Editor trouble is reported but never blocks the watcher
        if let Err(e) = launcher::open_in_editor(&self.settings, &self.script) {
            warn!("{e}");
        }

        let gate = Arc::new(ReloadGate::new());
        let mut watcher = ScriptWatcher::start(
            self.script.clone(),
            Arc::clone(&gate),
            Duration::from_millis(self.settings.debounce_ms),
        )?;

        let engine = ScriptEngine::new(Arc::clone(&self.document));
        let mut reloader = Reloader::new(
            Arc::clone(&self.document),
            engine,
            self.script.clone(),
            gate,
        );

        info!("watching {} (ctrl-c to stop)", self.script.display());

        // Reloads run here on the session task, which owns the document;
        // the watcher thread only signals.
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                saved = watcher.next_saved() => match saved {
                    Some(()) => {
                        if let Err(e) = reloader.reload() {
                            error!("{e}");
                        }
                    }
                    None => break,
                },
                _ = &mut shutdown => break,
            }
        }

        // Deterministic teardown: release the watch before saving
        watcher.stop();
        self.save_document()
    }

    fn save_document(&self) -> Result<()> {
        if let Ok(doc) = self.document.read() {
            doc.save()?;
            info!("saved {}", doc.path().display());
        }
        Ok(())
    }
}
