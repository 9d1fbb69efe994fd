//! `engine_viewer`
//!
//! Headless viewer on top of `engine_core`:
//! - Frame timing and FPS counting
//! - The demo scene (animated primitives, orbiting camera)
//! - The frame loop driving update, clear and render
//! - Command-line overrides for the config

pub mod app;
pub mod cli;
pub mod demo;
pub mod timer;

pub use app::{run, App, RunSummary};
pub use demo::DemoScene;
