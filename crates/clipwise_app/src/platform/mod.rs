//! Terminal shell around the ClipWise core: reads commands from stdin,
//! renders the view model as text and runs effects through the engine.
mod app;
pub mod commands;
pub mod config;
mod effects;
pub mod logging;
pub mod render;

pub use app::run_app;
