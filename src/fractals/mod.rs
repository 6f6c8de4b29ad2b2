pub mod common;
pub mod mandelbrot;
