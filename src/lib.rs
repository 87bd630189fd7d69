//! A small grid city builder drawn on an immediate-mode canvas.
//!
//! [`city`] owns the map, [`geometry`] derives road paths and hit tests from
//! it, and [`render`] paints the result onto any [`surface::Surface`].

#![warn(clippy::all, rust_2018_idioms)]

pub mod city;
pub mod config;
pub mod geometry;
pub mod model;
pub mod render;
pub mod surface;

mod app;
pub use app::TownshipApp;
