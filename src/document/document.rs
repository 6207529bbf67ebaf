use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GeometryObject, ObjectId, Shape};
use crate::error::Result;

/// On-disk form of a document
#[derive(Debug, Default, Serialize, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    objects: Vec<GeometryObject>,
}

/// A document holds geometry objects and a revision counter that is
/// bumped on every recompute. Objects keep their ids across save/load.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    objects: Vec<GeometryObject>,
    next_id: ObjectId,
    revision: u64,
}

impl Document {
    /// Load a document from disk. An empty file is an empty document.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: DocumentFile = if content.trim().is_empty() {
            DocumentFile::default()
        } else {
            serde_json::from_str(&content)?
        };

        let next_id = file.objects.iter().map(|o| o.id).max().map_or(1, |m| m + 1);

        Ok(Self {
            path: path.to_path_buf(),
            objects: file.objects,
            next_id,
            revision: 0,
        })
    }

    pub fn save(&self) -> Result<()> {
        let file = DocumentFile {
            objects: self.objects.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_object(&mut self, label: &str, shape: Shape) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(GeometryObject {
            id,
            label: label.to_string(),
            shape,
            position: [0.0; 3],
        });
        id
    }

    /// Remove an object by id. Returns false if no such object exists.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        match self.objects.iter().position(|o| o.id == id) {
            Some(idx) => {
                self.objects.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: ObjectId, position: [f64; 3]) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(object) => {
                object.position = position;
                true
            }
            None => false,
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&GeometryObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn objects(&self) -> &[GeometryObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn recompute(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_document(dir: &TempDir) -> Document {
        let path = dir.path().join("part.json");
        fs::write(&path, "{}").unwrap();
        Document::open(&path).unwrap()
    }

    #[test]
    fn open_empty_file_yields_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part.json");
        fs::write(&path, "").unwrap();

        let doc = Document::open(&path).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Document::open(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn add_object_assigns_increasing_ids() {
        let dir = TempDir::new().unwrap();
        let mut doc = empty_document(&dir);

        let a = doc.add_object("a", Shape::Sphere { radius: 1.0 });
        let b = doc.add_object("b", Shape::Sphere { radius: 2.0 });
        assert!(b > a);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn remove_object_removes_only_that_object() {
        let dir = TempDir::new().unwrap();
        let mut doc = empty_document(&dir);

        let a = doc.add_object("a", Shape::Sphere { radius: 1.0 });
        let b = doc.add_object("b", Shape::Sphere { radius: 2.0 });

        assert!(doc.remove_object(a));
        assert!(doc.object(a).is_none());
        assert!(doc.object(b).is_some());
        assert!(!doc.remove_object(a)); // already gone
    }

    #[test]
    fn recompute_bumps_revision() {
        let dir = TempDir::new().unwrap();
        let mut doc = empty_document(&dir);
        doc.recompute();
        doc.recompute();
        assert_eq!(doc.revision(), 2);
    }

    #[test]
    fn save_and_reopen_preserves_objects_and_ids() {
        let dir = TempDir::new().unwrap();
        let mut doc = empty_document(&dir);

        let a = doc.add_object(
            "base",
            Shape::Box {
                width: 50.0,
                depth: 30.0,
                height: 10.0,
            },
        );
        doc.set_position(a, [1.0, 2.0, 3.0]);
        doc.save().unwrap();

        let mut reopened = Document::open(doc.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        let object = reopened.object(a).unwrap();
        assert_eq!(object.label, "base");
        assert_eq!(object.position, [1.0, 2.0, 3.0]);

        // New ids continue past the loaded ones
        let b = reopened.add_object("boss", Shape::Cylinder { radius: 5.0, height: 20.0 });
        assert!(b > a);
    }
}
