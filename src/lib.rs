//! Chart generation for process/thread and network copy benchmarks.
//!
//! Measurements are loaded into a [`store::MeasurementStore`], turned into
//! series by [`functions::extract::SeriesExtractor`], laid out into figures by
//! [`components::figure::FigureComposer`] and written by a [`render::Renderer`].

pub mod components;
pub mod config;
pub mod datasets;
pub mod error;
pub mod functions;
pub mod models;
pub mod render;
pub mod report;
pub mod store;
pub mod views;

pub use error::{Error, Result};
