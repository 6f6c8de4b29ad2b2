//! Benchmarks for the escape-time evaluation and for a small end-to-end render
//! through the worker pool.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num::Complex;

use fractal_print::{
    core::{
        color_map::HueRamp,
        image_utils::{OutputFormat, PrintSpecification, Viewport},
        worker_pool::ProgressTicker,
    },
    fractals::mandelbrot::{
        diverges, render_mandelbrot, ColorMapParams, ConvergenceParams, MandelbrotParams,
        RenderOptions,
    },
};

fn evaluate_grid(limit_depth: u32) -> usize {
    let mut escaped_count = 0;
    for i in 0..64 {
        for j in 0..64 {
            let c = Complex::new(-2.5 + 3.75 * (i as f64) / 64.0, -1.25 + 2.5 * (j as f64) / 64.0);
            if diverges(black_box(c), limit_depth).is_some() {
                escaped_count += 1;
            }
        }
    }
    escaped_count
}

fn small_render_params() -> MandelbrotParams {
    MandelbrotParams {
        print_specification: PrintSpecification {
            width_inch: 2.0,
            height_inch: 2.0,
            dpi: 64,
            file_format: OutputFormat::Png,
            file_name_pattern: "benchmark".to_owned(),
        },
        viewport: Viewport {
            left: -2.5,
            right: 1.25,
            top: 1.25,
            bottom: -1.25,
        },
        convergence_params: ConvergenceParams { limit_depth: 256 },
        color_map: ColorMapParams {
            repeat_depth: 64,
            interior_color_rgb: [255, 255, 255],
            palette_trim_count: 38,
            hue_ramp: HueRamp::hsv(),
        },
        render_options: RenderOptions {
            worker_count: 4,
            progress_tick_count: 0,
        },
    }
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("diverges_grid_64x64", |b| {
        b.iter(|| black_box(evaluate_grid(256)));
    });

    let params = small_render_params();
    c.bench_function("render_mandelbrot_128x128", |b| {
        b.iter(|| {
            let mut ticker = ProgressTicker::new(std::io::sink(), 0, 0);
            black_box(render_mandelbrot(&params, &mut ticker).unwrap())
        });
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
