use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use super::ReloadGate;
use crate::document::{Document, ObjectId};
use crate::error::Result;
use crate::scripting::ScriptEngine;

/// Re-executes the companion script against the document, replacing the
/// objects created by the previous run.
///
/// The reloader keeps an explicit set of the object ids it owns. Before
/// each run exactly those ids are removed, so objects added to the
/// document by any other means are never touched. The owned set is
/// replaced with the run's creation log afterwards - also after a failed
/// run, so objects a script created before raising get cleaned up on the
/// next cycle. A failure after the removal step leaves the document
/// partially cleared for that cycle; there is no rollback.
pub struct Reloader {
    document: Arc<RwLock<Document>>,
    engine: ScriptEngine,
    script: PathBuf,
    gate: Arc<ReloadGate>,
    owned: Vec<ObjectId>,
}

impl Reloader {
    pub fn new(
        document: Arc<RwLock<Document>>,
        engine: ScriptEngine,
        script: PathBuf,
        gate: Arc<ReloadGate>,
    ) -> Self {
        Self {
            document,
            engine,
            script,
            gate,
            owned: Vec::new(),
        }
    }

    /// Ids of the objects owned by the most recent run
    pub fn owned(&self) -> &[ObjectId] {
        &self.owned
    }

    /// Run one reload cycle. A script failure is returned for reporting
    /// and leaves the reloader armed for the next save.
    pub fn reload(&mut self) -> Result<()> {
        if !self.gate.enter() {
            // Already reloading; the triggering save was stale
            return Ok(());
        }
        let result = self.run_cycle();
        self.gate.exit();
        result
    }

    fn run_cycle(&mut self) -> Result<()> {
        // Editors briefly remove the file during an atomic save
        if !self.script.exists() {
            tracing::debug!("script missing, skipping reload");
            return Ok(());
        }

        self.clear_owned();

        let outcome = self.engine.run_file(&self.script);
        self.owned = self.engine.take_created();

        if outcome.is_ok() {
            if let Ok(mut doc) = self.document.write() {
                doc.recompute();
                tracing::info!(
                    objects = self.owned.len(),
                    revision = doc.revision(),
                    "geometry updated"
                );
            }
        }

        outcome
    }

    fn clear_owned(&mut self) {
        if self.owned.is_empty() {
            return;
        }
        if let Ok(mut doc) = self.document.write() {
            for id in self.owned.drain(..) {
                doc.remove_object(id);
            }
        }
    }
}
