//! The host document: a flat set of geometry objects with JSON persistence

mod document;
mod object;

pub use document::Document;
pub use object::{GeometryObject, ObjectId, Shape};
