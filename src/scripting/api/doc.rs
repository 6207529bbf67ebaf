//! doc - geometry construction against the host document
//!
//! Usage in Rhai:
//! ```rhai
//! let base = doc::add_box("base", 50.0, 30.0, 10.0);
//! doc::move_to(base, 0.0, 0.0, 12.5);
//! ```

use std::sync::{Arc, RwLock};

use rhai::{Dynamic, EvalAltResult};

use crate::document::{Document, ObjectId, Shape};

/// Scripts write dimensions as either ints or floats; native functions
/// get no numeric coercion from Rhai, so accept both here.
fn number(value: Dynamic) -> Result<f64, Box<EvalAltResult>> {
    let type_name = value.type_name();
    if let Some(f) = value.clone().try_cast::<f64>() {
        Ok(f)
    } else if let Some(i) = value.try_cast::<i64>() {
        Ok(i as f64)
    } else {
        Err(format!("expected a number, got {type_name}").into())
    }
}

fn locked<T, E>(result: Result<T, E>) -> Result<T, Box<EvalAltResult>> {
    result.map_err(|_| "document lock poisoned".into())
}

/// Create the doc module. Every object created through it is recorded in
/// `created` so the caller knows which objects the run owns.
pub fn create_module(
    document: Arc<RwLock<Document>>,
    created: Arc<RwLock<Vec<ObjectId>>>,
) -> rhai::Module {
    let mut module = rhai::Module::new();

    let add_shape = {
        let document = Arc::clone(&document);
        let created = Arc::clone(&created);
        move |label: &str, shape: Shape| -> Result<i64, Box<EvalAltResult>> {
            let id = locked(document.write())?.add_object(label, shape);
            locked(created.write())?.push(id);
            Ok(id as i64)
        }
    };

    // add_box(label, width, depth, height) -> id
    {
        let add_shape = add_shape.clone();
        module.set_native_fn(
            "add_box",
            move |label: &str, width: Dynamic, depth: Dynamic, height: Dynamic| {
                add_shape(
                    label,
                    Shape::Box {
                        width: number(width)?,
                        depth: number(depth)?,
                        height: number(height)?,
                    },
                )
            },
        );
    }

    // add_cylinder(label, radius, height) -> id
    {
        let add_shape = add_shape.clone();
        module.set_native_fn(
            "add_cylinder",
            move |label: &str, radius: Dynamic, height: Dynamic| {
                add_shape(
                    label,
                    Shape::Cylinder {
                        radius: number(radius)?,
                        height: number(height)?,
                    },
                )
            },
        );
    }

    // add_sphere(label, radius) -> id
    module.set_native_fn("add_sphere", move |label: &str, radius: Dynamic| {
        add_shape(
            label,
            Shape::Sphere {
                radius: number(radius)?,
            },
        )
    });

    // move_to(id, x, y, z)
    {
        let d = Arc::clone(&document);
        module.set_native_fn(
            "move_to",
            move |id: i64, x: Dynamic, y: Dynamic, z: Dynamic| -> Result<(), Box<EvalAltResult>> {
                let position = [number(x)?, number(y)?, number(z)?];
                if locked(d.write())?.set_position(id as ObjectId, position) {
                    Ok(())
                } else {
                    Err(format!("no object with id {id}").into())
                }
            },
        );
    }

    // count() -> i64
    {
        let d = Arc::clone(&document);
        module.set_native_fn("count", move || -> Result<i64, Box<EvalAltResult>> {
            Ok(locked(d.read())?.len() as i64)
        });
    }

    module
}
