//! Parallel pixel scheduler. The image is flattened into a row-major index space,
//! indices are fed one at a time into a bounded work queue, a fixed number of
//! worker threads turn each index into a colored pixel, and the coordinator (the
//! calling thread) drains the results channel into the image buffer. Workers
//! never see the buffer; they hand back `(x, y, color)` by value.

use std::io::Write;

use crossbeam::channel::bounded;
use image::{Rgb, RgbImage};

use crate::core::error::RenderError;

/// Capacity of the work queue and of the results channel, per worker.
const CHANNEL_CAPACITY_PER_WORKER: usize = 256;

/**
 * Computes the color of a single pixel. Implementations must be stateless from
 * the point of view of the scheduler: the same pixel always yields the same color,
 * no matter which worker evaluates it, or when.
 */
pub trait PixelRenderer: Sync {
    fn render_pixel(&self, x: u32, y: u32) -> Rgb<u8>;
}

impl<F> PixelRenderer for F
where
    F: Fn(u32, u32) -> Rgb<u8> + Sync,
{
    fn render_pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        self(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedPixel {
    pub x: u32,
    pub y: u32,
    pub color: Rgb<u8>,
}

/// Row-major flattening: `index = y * width + x`.
pub fn flat_index_to_pixel(index: usize, width: u32) -> (u32, u32) {
    let width = width as usize;
    ((index % width) as u32, (index / width) as u32)
}

pub fn pixel_to_flat_index(x: u32, y: u32, width: u32) -> usize {
    (y as usize) * (width as usize) + (x as usize)
}

/**
 * Coordinator-side progress output: one dot every `total / tick_count`
 * completed pixels, and a newline once the render is done. Write failures are
 * ignored, progress is purely cosmetic.
 */
pub struct ProgressTicker<W: Write> {
    writer: W,
    interval: Option<usize>,
}

impl ProgressTicker<std::io::Stdout> {
    pub fn stdout(total_count: usize, tick_count: usize) -> Self {
        ProgressTicker::new(std::io::stdout(), total_count, tick_count)
    }
}

impl<W: Write> ProgressTicker<W> {
    pub fn new(writer: W, total_count: usize, tick_count: usize) -> Self {
        let interval = if tick_count == 0 {
            None
        } else {
            Some(total_count / tick_count).filter(|interval| *interval > 0)
        };
        ProgressTicker { writer, interval }
    }

    pub fn record(&mut self, completed_count: usize) {
        if let Some(interval) = self.interval {
            if completed_count % interval == 0 {
                let _ = write!(self.writer, ".");
                let _ = self.writer.flush();
            }
        }
    }

    pub fn finish(&mut self) {
        let _ = writeln!(self.writer);
        let _ = self.writer.flush();
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/**
 * Renders every pixel of a `width` x `height` image on `worker_count` threads.
 *
 * Every flat index is handed out exactly once and written back exactly once, so
 * the result does not depend on the worker count or on the order in which
 * results arrive. If any worker dies (panics), the render is abandoned and
 * `RenderError::WorkerFailure` is returned; there is no partial image.
 */
pub fn render_pixels<R, W>(
    width: u32,
    height: u32,
    worker_count: usize,
    renderer: &R,
    progress: &mut ProgressTicker<W>,
) -> Result<RgbImage, RenderError>
where
    R: PixelRenderer,
    W: Write,
{
    assert!(worker_count > 0, "worker pool must not be empty");
    let total_count = (width as usize) * (height as usize);
    let capacity = CHANNEL_CAPACITY_PER_WORKER.saturating_mul(worker_count);

    let mut imgbuf = RgbImage::new(width, height);
    let mut completed_count = 0;

    let (index_sender, index_receiver) = bounded::<usize>(capacity);
    let (result_sender, result_receiver) = bounded::<ComputedPixel>(capacity);

    let scope_result = crossbeam::scope(|scope| {
        scope.spawn(move |_| {
            for index in 0..total_count {
                // Every worker is gone: nobody is left to consume the queue.
                if index_sender.send(index).is_err() {
                    break;
                }
            }
        });

        for _ in 0..worker_count {
            let index_receiver = index_receiver.clone();
            let result_sender = result_sender.clone();
            scope.spawn(move |_| {
                for index in index_receiver.iter() {
                    let (x, y) = flat_index_to_pixel(index, width);
                    let color = renderer.render_pixel(x, y);
                    if result_sender.send(ComputedPixel { x, y, color }).is_err() {
                        break;
                    }
                }
            });
        }

        // Only the workers hold these now, so the results channel closes
        // exactly when the last worker exits.
        drop(index_receiver);
        drop(result_sender);

        for pixel in result_receiver.iter() {
            imgbuf.put_pixel(pixel.x, pixel.y, pixel.color);
            completed_count += 1;
            progress.record(completed_count);
        }
    });
    progress.finish();

    if scope_result.is_err() || completed_count != total_count {
        return Err(RenderError::WorkerFailure {
            completed: completed_count,
            expected: total_count,
        });
    }
    Ok(imgbuf)
}
