use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/**
 * Rectangular region of the plane that is sampled by the image. The top-left
 * pixel of the image lands on (left, top).
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Viewport {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if ![self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|bound| bound.is_finite())
        {
            return Err(ConfigError::NonFiniteViewport);
        }
        if self.left >= self.right {
            return Err(ConfigError::HorizontalBoundsOutOfOrder {
                left: self.left,
                right: self.right,
            });
        }
        if self.bottom >= self.top {
            return Err(ConfigError::VerticalBoundsOutOfOrder {
                bottom: self.bottom,
                top: self.top,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

pub const DEFAULT_FILE_NAME_PATTERN: &str =
    "image-mandelbrot-{width_inch}x{height_inch}-{dpi}dpi";

fn default_file_name_pattern() -> String {
    DEFAULT_FILE_NAME_PATTERN.to_owned()
}

/**
 * Physical description of the printed artifact. The pixel resolution is
 * derived from the print size and the dots-per-inch, and the dpi is carried
 * into the output file as metadata.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrintSpecification {
    pub width_inch: f64,
    pub height_inch: f64,
    pub dpi: u32,
    pub file_format: OutputFormat,
    #[serde(default = "default_file_name_pattern")]
    pub file_name_pattern: String,
}

impl PrintSpecification {
    fn pixel_count(&self, inches: f64) -> f64 {
        (inches * self.dpi as f64).round()
    }

    /// Only meaningful once `validate` has passed; oversized counts saturate.
    pub fn resolution(&self) -> nalgebra::Vector2<u32> {
        nalgebra::Vector2::new(
            self.pixel_count(self.width_inch) as u32,
            self.pixel_count(self.height_inch) as u32,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |inches: f64| inches.is_finite() && inches > 0.0;
        if !positive(self.width_inch) || !positive(self.height_inch) {
            return Err(ConfigError::NonPositivePrintSize {
                width_inch: self.width_inch,
                height_inch: self.height_inch,
            });
        }
        if self.dpi == 0 {
            return Err(ConfigError::ZeroDpi);
        }
        let too_large = ConfigError::ResolutionTooLarge {
            width_pixel: self.pixel_count(self.width_inch),
            height_pixel: self.pixel_count(self.height_inch),
        };
        let max_pixels = u32::MAX as f64;
        if self.pixel_count(self.width_inch) > max_pixels
            || self.pixel_count(self.height_inch) > max_pixels
        {
            return Err(too_large);
        }
        let resolution = self.resolution();
        if resolution[0] == 0 || resolution[1] == 0 {
            return Err(ConfigError::EmptyResolution {
                width_pixel: resolution[0],
                height_pixel: resolution[1],
            });
        }
        // three bytes per pixel in the image buffer
        let buffer_len = (resolution[0] as usize)
            .checked_mul(resolution[1] as usize)
            .and_then(|pixel_count| pixel_count.checked_mul(3));
        if buffer_len.is_none() {
            return Err(too_large);
        }
        Ok(())
    }

    /**
     * Expands the placeholders in `file_name_pattern`. The extension is not
     * included; it is appended by whoever writes the file.
     */
    pub fn file_base_name(&self) -> String {
        let resolution = self.resolution();
        self.file_name_pattern
            .replace("{width_inch}", &self.width_inch.to_string())
            .replace("{height_inch}", &self.height_inch.to_string())
            .replace("{dpi}", &self.dpi.to_string())
            .replace("{width_pixel}", &resolution[0].to_string())
            .replace("{height_pixel}", &resolution[1].to_string())
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_base_name(), self.file_format.extension())
    }
}

#[derive(Clone, Debug)]
/**
 * Used to map from image space into the "regular" domain used to generate the fractals.
 * Pixel index `0` lands on `x0` and pixel index `n` (one past the last pixel) lands on `x1`.
 */
pub struct LinearPixelMap {
    offset: f64,
    span: f64,
    pixel_count: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1)
     * @param x0: output of the map at 0
     * @param x1: output of the map at n
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert!(n > 0);
        LinearPixelMap {
            offset: x0,
            span: x1 - x0,
            pixel_count: n as f64,
        }
    }

    // Map from pixel (integer) to point (float)
    pub fn map(&self, index: u32) -> f64 {
        self.offset + self.span * (index as f64) / self.pixel_count
    }
}

/**
 * Plane-to-pixel mapper: converts pixel coordinates into points of the
 * viewport. Image rows grow downward while the imaginary axis grows upward,
 * so the vertical map runs from `top` to `bottom`.
 */
#[derive(Clone, Debug)]
pub struct PixelMapper {
    pub width: LinearPixelMap,
    pub height: LinearPixelMap,
}

impl PixelMapper {
    pub fn new(viewport: &Viewport, resolution: &nalgebra::Vector2<u32>) -> PixelMapper {
        PixelMapper {
            width: LinearPixelMap::new(resolution[0], viewport.left, viewport.right),
            height: LinearPixelMap::new(resolution[1], viewport.top, viewport.bottom),
        }
    }

    pub fn map(&self, point: &(u32, u32)) -> (f64, f64) {
        let (x, y) = point;
        (self.width.map(*x), self.height.map(*y))
    }
}
