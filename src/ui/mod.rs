pub mod app;
pub mod editor;
pub mod sidebar;
pub mod signin;
pub mod theme;
