mod writer;

pub use writer::{script_path, write_if_absent};
