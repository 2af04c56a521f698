pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod text;
pub mod ui;
pub mod utils;

pub use session::EditorSession;
pub use session::tools::Tool;
