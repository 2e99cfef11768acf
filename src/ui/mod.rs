//! Presentation and input: the canvas seam and its terminal backend.

pub mod canvas;
pub mod input;
pub mod renderer;
