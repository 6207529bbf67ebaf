//! Scripting module - Rhai runtime for companion geometry scripts
//!
//! Scripts run with the `doc` namespace bound to the host document:
//! - `doc::add_box(label, width, depth, height)` -> id
//! - `doc::add_cylinder(label, radius, height)` -> id
//! - `doc::add_sphere(label, radius)` -> id
//! - `doc::move_to(id, x, y, z)`
//! - `doc::count()` -> number of objects in the document

mod api;
mod engine;

pub use engine::ScriptEngine;
