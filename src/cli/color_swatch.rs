use std::path::PathBuf;

use image::RgbImage;

use crate::{
    core::{error::RenderError, image_sink::write_image, image_utils::OutputFormat},
    fractals::mandelbrot::{MandelbrotParams, MandelbrotRenderer},
};

pub const SWATCH_COLUMN_WIDTH: u32 = 4;
pub const SWATCH_HEIGHT: u32 = 64;

/**
 * One column per escape depth, shallowest on the left, followed by a final
 * column in the interior color.
 */
pub fn palette_swatch(params: &MandelbrotParams) -> Result<RgbImage, RenderError> {
    let renderer = MandelbrotRenderer::new(params)?;
    let limit_depth = params.convergence_params.limit_depth;
    let column_count = limit_depth + 1;

    let mut imgbuf = RgbImage::new(column_count * SWATCH_COLUMN_WIDTH, SWATCH_HEIGHT);
    for (x, _, pixel) in imgbuf.enumerate_pixels_mut() {
        let column = x / SWATCH_COLUMN_WIDTH;
        *pixel = if column < limit_depth {
            renderer.color_of(Some(column))
        } else {
            renderer.color_of(None)
        };
    }
    Ok(imgbuf)
}

pub fn generate_color_swatch(
    params: &MandelbrotParams,
    directory_path: PathBuf,
) -> Result<PathBuf, RenderError> {
    let imgbuf = palette_swatch(params)?;
    let swatch_path = directory_path.join(format!(
        "{}_palette.png",
        params.print_specification.file_base_name()
    ));
    write_image(
        &swatch_path,
        &imgbuf,
        params.print_specification.dpi,
        OutputFormat::Png,
    )?;
    Ok(swatch_path)
}
