pub mod app;
pub mod audio;
pub mod config;
pub mod params;
pub mod picker;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;
pub mod utility;
pub mod window;
