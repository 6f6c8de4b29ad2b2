use std::{io::Write, path::PathBuf};

use crate::{
    core::{
        error::RenderError,
        file_io::{serialize_to_json, FilePrefix},
        image_sink::write_image,
        stopwatch::Stopwatch,
        worker_pool::{render_pixels, ProgressTicker},
    },
    fractals::{
        common::FractalParams,
        mandelbrot::{MandelbrotParams, MandelbrotRenderer},
    },
};

/**
 * Renders the fractal described by `params` into `directory_path`.
 * @return: path of the image file that was written.
 */
pub fn render_fractal(
    params: &FractalParams,
    directory_path: PathBuf,
) -> Result<PathBuf, RenderError> {
    match params {
        FractalParams::Mandelbrot(inner_params) => {
            render_mandelbrot_to_file(inner_params, directory_path)
        }
    }
}

/**
 * Full print job: validate, build the palette, compute every pixel, then write the
 * image followed by a copy of the parameters and a diagnostics file. Nothing is
 * written unless every pixel was computed.
 */
pub fn render_mandelbrot_to_file(
    params: &MandelbrotParams,
    directory_path: PathBuf,
) -> Result<PathBuf, RenderError> {
    let mut stopwatch = Stopwatch::new("Mandelbrot Render Stopwatch");

    let renderer = MandelbrotRenderer::new(params)?;
    let print_spec = &params.print_specification;
    let resolution = params.resolution();
    let worker_count = params.render_options.worker_count;
    log::info!(
        "Rendering {} x {} pixels ({} x {} inches at {} dpi) on {} workers",
        resolution[0],
        resolution[1],
        print_spec.width_inch,
        print_spec.height_inch,
        print_spec.dpi,
        worker_count
    );
    stopwatch.record_split("validate and build palette");

    let mut progress = ProgressTicker::stdout(
        (resolution[0] as usize) * (resolution[1] as usize),
        params.render_options.progress_tick_count,
    );
    let image = render_pixels(
        resolution[0],
        resolution[1],
        worker_count,
        &renderer,
        &mut progress,
    )?;
    stopwatch.record_split("compute escape depths");

    let file_prefix = FilePrefix {
        directory_path,
        file_base: print_spec.file_base_name(),
    };
    let image_path =
        file_prefix.with_suffix(&format!(".{}", print_spec.file_format.extension()));
    write_image(&image_path, &image, print_spec.dpi, print_spec.file_format)?;
    stopwatch.record_split("write image");

    serialize_to_json(
        &file_prefix.with_suffix("_params.json"),
        &FractalParams::Mandelbrot(Box::new(params.clone())),
    )?;

    let mut diagnostics_file = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    writeln!(
        diagnostics_file,
        "Resolution: {} x {} pixels at {} dpi",
        resolution[0], resolution[1], print_spec.dpi
    )?;
    writeln!(diagnostics_file, "Workers: {}", worker_count)?;
    stopwatch.display(&mut diagnostics_file)?;
    diagnostics_file.flush()?;

    Ok(image_path)
}
