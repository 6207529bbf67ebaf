use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Launch the configured editor on the script file, detached so the
/// session stays responsive. The child is never waited on; GUI editors
/// typically hand off to an existing instance anyway.
pub fn open_in_editor(settings: &Settings, script: &Path) -> Result<()> {
    Command::new(&settings.editor)
        .args(&settings.editor_args)
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| Error::EditorLaunch {
            editor: settings.editor.clone(),
            source,
        })?;
    Ok(())
}
