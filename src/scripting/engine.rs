//! The Rhai engine that executes companion geometry scripts

use std::path::Path;
use std::sync::{Arc, RwLock};

use rhai::{Engine, Scope};

use super::api;
use crate::document::{Document, ObjectId};
use crate::error::{Error, Result};

/// Executes geometry scripts against a shared document.
///
/// Each run uses a fresh scope, so nothing a script defines leaks into
/// the next run. Objects created during a run are recorded; the caller
/// drains them with [`take_created`](Self::take_created) after every run,
/// successful or not.
pub struct ScriptEngine {
    engine: Engine,
    created: Arc<RwLock<Vec<ObjectId>>>,
}

impl ScriptEngine {
    pub fn new(document: Arc<RwLock<Document>>) -> Self {
        let created = Arc::new(RwLock::new(Vec::new()));
        let engine = Self::create_engine(document, Arc::clone(&created));

        Self { engine, created }
    }

    /// Create the Rhai engine with the `doc` namespace
    fn create_engine(
        document: Arc<RwLock<Document>>,
        created: Arc<RwLock<Vec<ObjectId>>>,
    ) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(1_000_000);

        let doc_module = api::doc::create_module(document, created);
        engine.register_static_module("doc", doc_module.into());

        // Script output goes to the session console
        engine.register_fn("print", |msg: &str| {
            tracing::info!("[script] {msg}");
        });

        engine
    }

    /// Read and execute a script file in a fresh scope
    pub fn run_file(&self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.eval(&content)
    }

    /// Evaluate script text in a fresh scope
    pub fn eval(&self, script: &str) -> Result<()> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| Error::Script(format!("parse error: {e}")))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| Error::Script(e.to_string()))
    }

    /// Take the ids of objects created since the last call, in creation
    /// order. Also populated by a failed run, up to the point of failure.
    pub fn take_created(&self) -> Vec<ObjectId> {
        self.created
            .write()
            .map(|mut c| c.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Shape;
    use std::fs;
    use tempfile::TempDir;

    fn test_document(dir: &TempDir) -> Arc<RwLock<Document>> {
        let path = dir.path().join("part.json");
        fs::write(&path, "{}").unwrap();
        Arc::new(RwLock::new(Document::open(&path).unwrap()))
    }

    #[test]
    fn add_box_creates_object_with_dimensions() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        engine
            .eval(r#"doc::add_box("base", 50.0, 30.0, 10.0);"#)
            .unwrap();

        let doc = document.read().unwrap();
        assert_eq!(doc.len(), 1);
        let object = &doc.objects()[0];
        assert_eq!(object.label, "base");
        assert_eq!(
            object.shape,
            Shape::Box {
                width: 50.0,
                depth: 30.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn integer_dimensions_are_accepted() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        engine
            .eval(
                r#"
                let box_width = 50;
                doc::add_box("base", box_width, 30, 10);
            "#,
            )
            .unwrap();

        let doc = document.read().unwrap();
        assert_eq!(
            doc.objects()[0].shape,
            Shape::Box {
                width: 50.0,
                depth: 30.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn non_numeric_dimension_raises() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(document);

        let err = engine
            .eval(r#"doc::add_sphere("s", "big");"#)
            .unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[test]
    fn created_ids_are_tracked_in_order() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        engine
            .eval(
                r#"
                doc::add_box("a", 1.0, 1.0, 1.0);
                doc::add_sphere("b", 2.0);
                doc::add_cylinder("c", 1.0, 5.0);
            "#,
            )
            .unwrap();

        let created = engine.take_created();
        assert_eq!(created.len(), 3);
        assert!(created[0] < created[1] && created[1] < created[2]);

        // Drained: a second take returns nothing
        assert!(engine.take_created().is_empty());
    }

    #[test]
    fn failed_run_still_reports_partial_creations() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        let err = engine
            .eval(
                r#"
                doc::add_box("a", 1.0, 1.0, 1.0);
                throw "boom";
            "#,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Script(_)));

        assert_eq!(engine.take_created().len(), 1);
        assert_eq!(document.read().unwrap().len(), 1);
    }

    #[test]
    fn syntax_error_is_a_script_error() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(document);

        let err = engine.eval("doc::add_box(").unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[test]
    fn move_to_positions_an_object() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        engine
            .eval(
                r#"
                let id = doc::add_sphere("s", 3.0);
                doc::move_to(id, 1.0, 2, 3.5);
            "#,
            )
            .unwrap();

        let doc = document.read().unwrap();
        assert_eq!(doc.objects()[0].position, [1.0, 2.0, 3.5]);
    }

    #[test]
    fn move_to_unknown_id_raises() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(document);

        let err = engine.eval("doc::move_to(99, 0.0, 0.0, 0.0);").unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[test]
    fn scope_does_not_leak_between_runs() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(document);

        engine.eval("let leftover = 42;").unwrap();
        assert!(engine.eval("doc::add_sphere(\"s\", leftover);").is_err());
    }

    #[test]
    fn count_sees_objects_from_any_source() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        document
            .write()
            .unwrap()
            .add_object("user", Shape::Sphere { radius: 1.0 });

        let engine = ScriptEngine::new(Arc::clone(&document));
        engine
            .eval(
                r#"
                doc::add_sphere("script", 2.0);
                if doc::count() != 2 {
                    throw "expected 2 objects";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn run_file_reads_script_from_disk() {
        let dir = TempDir::new().unwrap();
        let document = test_document(&dir);
        let engine = ScriptEngine::new(Arc::clone(&document));

        let script = dir.path().join("part_geometry.rhai");
        fs::write(&script, r#"doc::add_box("base", 80.0, 30.0, 10.0);"#).unwrap();

        engine.run_file(&script).unwrap();
        assert_eq!(document.read().unwrap().len(), 1);
    }
}
