use std::io::Write;

use image::{Rgb, RgbImage};
use num::Complex;
use serde::{Deserialize, Serialize};

use crate::core::{
    color_map::{CyclicPalette, HueRamp, DEFAULT_PALETTE_TRIM_COUNT},
    error::{ConfigError, RenderError},
    image_utils::{PixelMapper, PrintSpecification, Viewport},
    worker_pool::{render_pixels, PixelRenderer, ProgressTicker},
};

/// The orbit has escaped once `|z|` exceeds this radius.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Upper bound on `render_options.worker_count`.
pub const MAX_WORKER_COUNT: usize = 1024;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConvergenceParams {
    pub limit_depth: u32,
}

fn default_palette_trim_count() -> usize {
    DEFAULT_PALETTE_TRIM_COUNT
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColorMapParams {
    pub repeat_depth: u32,
    pub interior_color_rgb: [u8; 3],
    #[serde(default = "default_palette_trim_count")]
    pub palette_trim_count: usize,
    #[serde(default)]
    pub hue_ramp: HueRamp,
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_progress_tick_count() -> usize {
    100
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderOptions {
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_progress_tick_count")]
    pub progress_tick_count: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            worker_count: default_worker_count(),
            progress_tick_count: default_progress_tick_count(),
        }
    }
}

/**
 * Complete, immutable description of one Mandelbrot print job. Nothing about a
 * render lives outside of this value, so independent renders can run side by
 * side in one process.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MandelbrotParams {
    pub print_specification: PrintSpecification,
    pub viewport: Viewport,
    pub convergence_params: ConvergenceParams,
    pub color_map: ColorMapParams,
    #[serde(default)]
    pub render_options: RenderOptions,
}

impl MandelbrotParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.print_specification.validate()?;
        self.viewport.validate()?;
        if self.convergence_params.limit_depth == 0 {
            return Err(ConfigError::ZeroLimitDepth);
        }
        if self.color_map.repeat_depth == 0 {
            return Err(ConfigError::ZeroRepeatDepth);
        }
        self.color_map.hue_ramp.validate()?;
        if self.render_options.worker_count == 0 {
            return Err(ConfigError::ZeroWorkerCount);
        }
        if self.render_options.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::TooManyWorkers {
                worker_count: self.render_options.worker_count,
                max_worker_count: MAX_WORKER_COUNT,
            });
        }
        Ok(())
    }

    pub fn resolution(&self) -> nalgebra::Vector2<u32> {
        self.print_specification.resolution()
    }
}

/// Closed-form test for the main cardioid: `|1 - sqrt(1 - 4c)| < 1`, using the
/// principal branch of the square root.
pub fn is_in_main_cardioid(c: Complex<f64>) -> bool {
    let one = Complex::new(1.0, 0.0);
    (one - (one - c * 4.0).sqrt()).norm() < 1.0
}

/// Closed-form test for the period-2 disk centered on -1: `|1 + c| < 1/4`.
pub fn is_in_main_disk(c: Complex<f64>) -> bool {
    (c + 1.0).norm() < 0.25
}

/**
 * Escape-time evaluation of `z := z^2 + c` starting from `z = 0`.
 *
 * @return: `Some(depth)` with the zero-based iteration at which `|z|` first
 * exceeded the escape radius, or `None` if the point is treated as part of the
 * set (inside the cardioid or the disk, or still bounded after `limit_depth`
 * iterations).
 */
pub fn diverges(c: Complex<f64>, limit_depth: u32) -> Option<u32> {
    if is_in_main_cardioid(c) || is_in_main_disk(c) {
        return None;
    }
    let mut z = Complex::new(0.0, 0.0);
    for depth in 0..limit_depth {
        z = z * z + c;
        if z.norm() > ESCAPE_RADIUS {
            return Some(depth);
        }
    }
    None
}

/**
 * Everything a worker needs to color a pixel: the plane mapping, the depth limit
 * and the precomputed palette. Built once per render and shared read-only by all
 * workers.
 */
#[derive(Clone, Debug)]
pub struct MandelbrotRenderer {
    pixel_mapper: PixelMapper,
    limit_depth: u32,
    palette: CyclicPalette,
    interior_color: Rgb<u8>,
}

impl MandelbrotRenderer {
    pub fn new(params: &MandelbrotParams) -> Result<MandelbrotRenderer, ConfigError> {
        params.validate()?;
        let color_map = &params.color_map;
        Ok(MandelbrotRenderer {
            pixel_mapper: PixelMapper::new(&params.viewport, &params.resolution()),
            limit_depth: params.convergence_params.limit_depth,
            palette: CyclicPalette::new(
                &color_map.hue_ramp,
                color_map.repeat_depth,
                params.convergence_params.limit_depth,
                color_map.palette_trim_count,
            ),
            interior_color: Rgb(color_map.interior_color_rgb),
        })
    }

    pub fn palette(&self) -> &CyclicPalette {
        &self.palette
    }

    pub fn interior_color(&self) -> Rgb<u8> {
        self.interior_color
    }

    pub fn pixel_to_coordinate(&self, x: u32, y: u32) -> Complex<f64> {
        let (re, im) = self.pixel_mapper.map(&(x, y));
        Complex::new(re, im)
    }

    pub fn escape_depth(&self, x: u32, y: u32) -> Option<u32> {
        diverges(self.pixel_to_coordinate(x, y), self.limit_depth)
    }

    pub fn color_of(&self, result: Option<u32>) -> Rgb<u8> {
        match result {
            Some(depth) => self.palette.color(depth),
            None => self.interior_color,
        }
    }
}

impl PixelRenderer for MandelbrotRenderer {
    fn render_pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        self.color_of(self.escape_depth(x, y))
    }
}

/**
 * Renders the full image described by `params`. Parameters are validated before
 * any work starts; progress dots go to `progress`.
 */
pub fn render_mandelbrot<W: Write>(
    params: &MandelbrotParams,
    progress: &mut ProgressTicker<W>,
) -> Result<RgbImage, RenderError> {
    let renderer = MandelbrotRenderer::new(params)?;
    let resolution = params.resolution();
    render_pixels(
        resolution[0],
        resolution[1],
        params.render_options.worker_count,
        &renderer,
        progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image_utils::OutputFormat;

    fn preview_params() -> MandelbrotParams {
        MandelbrotParams {
            print_specification: PrintSpecification {
                width_inch: 1.0,
                height_inch: 1.0,
                dpi: 100,
                file_format: OutputFormat::Png,
                file_name_pattern: "preview".to_owned(),
            },
            viewport: Viewport {
                left: -2.5,
                right: 1.25,
                top: 1.25,
                bottom: -1.25,
            },
            convergence_params: ConvergenceParams { limit_depth: 50 },
            color_map: ColorMapParams {
                repeat_depth: 20,
                interior_color_rgb: [255, 255, 255],
                palette_trim_count: DEFAULT_PALETTE_TRIM_COUNT,
                hue_ramp: HueRamp::hsv(),
            },
            render_options: RenderOptions {
                worker_count: 2,
                progress_tick_count: 0,
            },
        }
    }

    #[test]
    fn test_origin_is_bounded() {
        for limit_depth in [0, 1, 2, 50, 500] {
            assert_eq!(diverges(Complex::new(0.0, 0.0), limit_depth), None);
        }
    }

    #[test]
    fn test_far_point_escapes_immediately() {
        for limit_depth in [1, 2, 50, 500] {
            assert_eq!(diverges(Complex::new(3.0, 0.0), limit_depth), Some(0));
            assert_eq!(diverges(Complex::new(-2.5, 1.25), limit_depth), Some(0));
        }
    }

    #[test]
    fn test_escape_depth_is_zero_based() {
        // 0.5 -> 0.75 -> 1.0625 -> 1.6289... -> 3.15...: escapes on the fifth step
        assert_eq!(diverges(Complex::new(0.5, 0.0), 50), Some(4));
        assert_eq!(diverges(Complex::new(0.5, 0.0), 5), Some(4));
        // not enough iterations to see it escape
        assert_eq!(diverges(Complex::new(0.5, 0.0), 4), None);
    }

    #[test]
    fn test_fast_path_regions() {
        let cardioid_points = [
            Complex::new(0.0, 0.0),
            Complex::new(0.2, 0.0),
            Complex::new(-0.5, 0.5),
            Complex::new(0.25, 0.45),
            Complex::new(-0.7, 0.2),
        ];
        for c in cardioid_points.iter() {
            assert!(is_in_main_cardioid(*c), "{} should be in the cardioid", c);
        }

        let disk_points = [
            Complex::new(-1.0, 0.0),
            Complex::new(-1.2, 0.0),
            Complex::new(-0.9, 0.1),
        ];
        for c in disk_points.iter() {
            assert!(is_in_main_disk(*c), "{} should be in the disk", c);
        }

        let outside_points = [
            Complex::new(0.3, 0.0),
            Complex::new(-2.0, 0.5),
            Complex::new(0.5, 0.0),
            Complex::new(-0.75, 0.0),
        ];
        for c in outside_points.iter() {
            assert!(!is_in_main_cardioid(*c), "{} should not be in the cardioid", c);
            assert!(!is_in_main_disk(*c), "{} should not be in the disk", c);
        }
    }

    #[test]
    fn test_fast_path_points_are_bounded_at_every_depth() {
        let points = [
            Complex::new(0.2, 0.0),
            Complex::new(-1.0, 0.0),
            Complex::new(-0.5, 0.5),
            Complex::new(-1.1, 0.1),
        ];
        for c in points.iter() {
            assert!(is_in_main_cardioid(*c) || is_in_main_disk(*c));
            for limit_depth in 1..20 {
                assert_eq!(diverges(*c, limit_depth), None);
            }
        }
    }

    #[test]
    fn test_cardioid_on_the_positive_real_axis() {
        // 1 - 4c is negative here; either branch gives |1 -/+ i r| > 1
        assert!(!is_in_main_cardioid(Complex::new(0.3, 0.0)));
        assert!(!is_in_main_cardioid(Complex::new(0.3, -0.0)));
        // cusp of the cardioid is on the boundary, not inside
        assert!(!is_in_main_cardioid(Complex::new(0.25, 0.0)));
    }

    #[test]
    fn test_color_of() {
        let renderer = MandelbrotRenderer::new(&preview_params()).unwrap();
        assert_eq!(renderer.color_of(None), Rgb([255, 255, 255]));
        assert_eq!(renderer.color_of(Some(0)), renderer.palette().color(0));
        assert_eq!(renderer.color_of(Some(49)), renderer.palette().color(49));
    }

    #[test]
    fn test_top_left_pixel_escapes_quickly() {
        let renderer = MandelbrotRenderer::new(&preview_params()).unwrap();
        assert_eq!(
            renderer.pixel_to_coordinate(0, 0),
            Complex::new(-2.5, 1.25)
        );
        let depth = renderer.escape_depth(0, 0).expect("far outside the set");
        assert!(depth < 3);
        assert_eq!(
            renderer.render_pixel(0, 0),
            renderer.palette().color(depth)
        );
    }

    #[test]
    fn test_render_validates_before_computing() {
        let mut params = preview_params();
        params.render_options.worker_count = 0;
        let mut ticker = ProgressTicker::new(Vec::new(), 0, 0);
        assert!(matches!(
            render_mandelbrot(&params, &mut ticker),
            Err(RenderError::Config(ConfigError::ZeroWorkerCount))
        ));
        assert!(ticker.into_inner().is_empty());

        let mut params = preview_params();
        params.convergence_params.limit_depth = 0;
        assert_eq!(params.validate(), Err(ConfigError::ZeroLimitDepth));

        let mut params = preview_params();
        params.color_map.repeat_depth = 0;
        assert_eq!(params.validate(), Err(ConfigError::ZeroRepeatDepth));

        let mut params = preview_params();
        params.render_options.worker_count = MAX_WORKER_COUNT;
        assert!(params.validate().is_ok());
        params.render_options.worker_count = usize::MAX;
        assert_eq!(
            params.validate(),
            Err(ConfigError::TooManyWorkers {
                worker_count: usize::MAX,
                max_worker_count: MAX_WORKER_COUNT
            })
        );
    }

    #[test]
    fn test_render_preview() {
        let params = preview_params();
        let mut ticker = ProgressTicker::new(Vec::new(), 0, 0);
        let image = render_mandelbrot(&params, &mut ticker).unwrap();
        assert_eq!(image.dimensions(), (100, 100));

        // the origin lands on pixel (200/3, 50): inside the set
        let renderer = MandelbrotRenderer::new(&params).unwrap();
        assert_eq!(renderer.escape_depth(66, 50), None);
        assert_eq!(image.get_pixel(66, 50), &Rgb([255, 255, 255]));
    }
}
