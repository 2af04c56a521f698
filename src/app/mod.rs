pub mod editor;
pub mod input_handler;

pub use editor::EditorApp;
