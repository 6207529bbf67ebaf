//! Creates the starter companion script next to the document

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Result;

/// Starter content for a freshly created companion script
const TEMPLATE: &str = r#"// Companion geometry script.
// Edit and save this file: the document regenerates on every save.

// Parameters
let box_width = 50.0;
let box_depth = 30.0;
let box_height = 10.0;

// Geometry
let base = doc::add_box("base", box_width, box_depth, box_height);
doc::move_to(base, 0.0, 0.0, 0.0);

doc::add_cylinder("boss", 6.0, 25.0);

print("objects: " + doc::count());
"#;

/// Derive the companion script path from the document path: same
/// directory, `<stem><suffix>.<ext>`.
pub fn script_path(document: &Path, settings: &Settings) -> PathBuf {
    let stem = document
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let name = format!("{stem}{}.{}", settings.script_suffix, settings.script_ext);
    document.with_file_name(name)
}

/// Write the starter script unless the file already exists. Returns true
/// when a new file was created. Existing user content is never touched.
pub fn write_if_absent(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, TEMPLATE)?;
    Ok(true)
}
