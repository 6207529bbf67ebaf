//! Session configuration, customizable via an optional `init.rhai`

mod engine;
mod settings;

pub use engine::ConfigEngine;
pub use settings::Settings;
