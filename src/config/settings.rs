/// Session settings that can be customized via the Rhai config file
#[derive(Debug, Clone)]
pub struct Settings {
    // External editor
    pub editor: String,
    pub editor_args: Vec<String>,

    // Companion script naming: <document-stem><suffix>.<ext>
    // Must stay stable across runs so the watcher keeps matching.
    pub script_suffix: String,
    pub script_ext: String,

    // Minimum gap between reloads, for editors that write-then-touch
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: default_editor(),
            editor_args: Vec::new(),

            script_suffix: "_geometry".to_string(),
            script_ext: "rhai".to_string(),

            debounce_ms: 500,
        }
    }
}

fn default_editor() -> String {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string())
}
