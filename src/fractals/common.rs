use serde::{Deserialize, Serialize};

use super::mandelbrot::MandelbrotParams;

/**
 * Top-level contents of a parameter file. The variant name is the outer JSON key,
 * e.g. `{ "Mandelbrot": { ... } }`.
 */
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum FractalParams {
    Mandelbrot(Box<MandelbrotParams>),
}
