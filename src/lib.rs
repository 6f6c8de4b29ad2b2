//! Renders the Mandelbrot set to print-quality PNG and PDF files.
//!
//! A render is described entirely by an immutable parameter value
//! ([`fractals::mandelbrot::MandelbrotParams`]), evaluated by an explicit pool
//! of worker threads ([`core::worker_pool`]) and written out with its print
//! resolution ([`core::image_sink`]).

pub mod cli;
pub mod core;
pub mod fractals;
