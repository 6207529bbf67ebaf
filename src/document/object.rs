use serde::{Deserialize, Serialize};

/// Unique within one document, assigned in creation order
pub type ObjectId = u64;

/// A solid primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Box { width: f64, depth: f64, height: f64 },
    Cylinder { radius: f64, height: f64 },
    Sphere { radius: f64 },
}

/// One geometry object in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryObject {
    pub id: ObjectId,
    pub label: String,
    pub shape: Shape,
    #[serde(default)]
    pub position: [f64; 3],
}
