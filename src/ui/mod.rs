pub mod tool_settings;
pub mod top_bar;
