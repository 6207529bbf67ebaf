mod editor;

pub use editor::open_in_editor;
