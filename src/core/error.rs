use std::fmt;

/**
 * Problems with the render parameters. These are detected before any pixel is
 * computed, so a configuration error never leaves a partial output behind.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonFiniteViewport,
    HorizontalBoundsOutOfOrder { left: f64, right: f64 },
    VerticalBoundsOutOfOrder { bottom: f64, top: f64 },
    NonPositivePrintSize { width_inch: f64, height_inch: f64 },
    ZeroDpi,
    EmptyResolution { width_pixel: u32, height_pixel: u32 },
    ResolutionTooLarge { width_pixel: f64, height_pixel: f64 },
    ZeroLimitDepth,
    ZeroRepeatDepth,
    ZeroWorkerCount,
    TooManyWorkers { worker_count: usize, max_worker_count: usize },
    MalformedHueRamp { channel: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFiniteViewport => write!(f, "viewport bounds must be finite"),
            ConfigError::HorizontalBoundsOutOfOrder { left, right } => write!(
                f,
                "viewport requires left < right, got left = {}, right = {}",
                left, right
            ),
            ConfigError::VerticalBoundsOutOfOrder { bottom, top } => write!(
                f,
                "viewport requires bottom < top, got bottom = {}, top = {}",
                bottom, top
            ),
            ConfigError::NonPositivePrintSize {
                width_inch,
                height_inch,
            } => write!(
                f,
                "print size must be positive, got {} x {} inches",
                width_inch, height_inch
            ),
            ConfigError::ZeroDpi => write!(f, "dpi must be positive"),
            ConfigError::EmptyResolution {
                width_pixel,
                height_pixel,
            } => write!(
                f,
                "resolution must be at least 1 x 1 pixels, got {} x {}",
                width_pixel, height_pixel
            ),
            ConfigError::ResolutionTooLarge {
                width_pixel,
                height_pixel,
            } => write!(
                f,
                "resolution of {} x {} pixels is too large to render",
                width_pixel, height_pixel
            ),
            ConfigError::ZeroLimitDepth => write!(f, "limit_depth must be at least 1"),
            ConfigError::ZeroRepeatDepth => write!(f, "repeat_depth must be at least 1"),
            ConfigError::ZeroWorkerCount => write!(f, "worker_count must be at least 1"),
            ConfigError::TooManyWorkers {
                worker_count,
                max_worker_count,
            } => write!(
                f,
                "worker_count must be at most {}, got {}",
                max_worker_count, worker_count
            ),
            ConfigError::MalformedHueRamp { channel, reason } => {
                write!(f, "hue ramp channel `{}`: {}", channel, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/**
 * Everything that can abort a render. There is no recovery path: any of these
 * terminates the batch job without writing the image.
 */
#[derive(Debug)]
pub enum RenderError {
    Config(ConfigError),
    /// A worker died before every pixel was delivered to the coordinator.
    WorkerFailure {
        completed: usize,
        expected: usize,
    },
    Io(std::io::Error),
    Png(png::EncodingError),
    Jpeg(image::ImageError),
    Pdf(lopdf::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(err) => write!(f, "invalid configuration: {}", err),
            RenderError::WorkerFailure {
                completed,
                expected,
            } => write!(
                f,
                "worker failure: only {} of {} pixels were computed",
                completed, expected
            ),
            RenderError::Io(err) => write!(f, "i/o error: {}", err),
            RenderError::Png(err) => write!(f, "unable to encode PNG: {}", err),
            RenderError::Jpeg(err) => write!(f, "unable to encode JPEG stream: {}", err),
            RenderError::Pdf(err) => write!(f, "unable to write PDF: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Config(err) => Some(err),
            RenderError::WorkerFailure { .. } => None,
            RenderError::Io(err) => Some(err),
            RenderError::Png(err) => Some(err),
            RenderError::Jpeg(err) => Some(err),
            RenderError::Pdf(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RenderError {
    fn from(err: ConfigError) -> Self {
        RenderError::Config(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<png::EncodingError> for RenderError {
    fn from(err: png::EncodingError) -> Self {
        RenderError::Png(err)
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Jpeg(err)
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err)
    }
}
