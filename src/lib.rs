//! Terminal disk defragmenter animation.
//!
//! A synthetic block grid is generated, scanned, defragmented and compacted,
//! with every step drawn through a [`render::Renderer`].

pub mod app;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod models;
pub mod render;
pub mod ui;

pub use error::{Error, Result};
