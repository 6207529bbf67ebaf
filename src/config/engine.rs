use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rhai::Engine;

use super::Settings;
use crate::error::{Error, Result};

/// The Rhai engine for the user's configuration file
pub struct ConfigEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let engine = Self::create_engine(Arc::clone(&settings));

        Self { engine, settings }
    }

    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Limit script execution for safety
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_editor", move |command: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.editor = command.to_string();
                    settings.editor_args.clear();
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("get_editor", move || -> String {
                s.read().map(|s| s.editor.clone()).unwrap_or_default()
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("add_editor_arg", move |arg: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.editor_args.push(arg.to_string());
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_script_suffix", move |suffix: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.script_suffix = suffix.to_string();
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_script_ext", move |ext: &str| {
                if let Ok(mut settings) = s.write() {
                    settings.script_ext = ext.trim_start_matches('.').to_string();
                }
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_debounce_ms", move |ms: i64| {
                if let Ok(mut settings) = s.write() {
                    settings.debounce_ms = ms.max(0) as u64;
                }
            });
        }

        // Utility functions
        engine.register_fn("print", |msg: &str| {
            tracing::info!("[config] {msg}");
        });

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &PathBuf) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.eval(&content)
    }

    /// Evaluate a Rhai config string
    pub fn eval(&mut self, script: &str) -> Result<()> {
        self.engine
            .run(script)
            .map_err(|e| Error::Script(format!("config error: {e}")))
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        self.settings.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("regen"))
    }

    /// Get the default config file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<()> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}
