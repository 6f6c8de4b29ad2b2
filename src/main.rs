use anyhow::Context;
use clap::Parser;

use fractal_print::{
    cli::{
        args::{CommandsEnum, FractalPrintArgs},
        color_swatch::generate_color_swatch,
        render::render_fractal,
    },
    core::file_io::{build_output_path_with_date_time, maybe_date_time_string},
    fractals::common::FractalParams,
};

fn read_fractal_params(path: &str) -> anyhow::Result<FractalParams> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read param file: {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Unable to parse param file: {}", path))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: FractalPrintArgs = FractalPrintArgs::parse();

    match &args.command {
        Some(CommandsEnum::Render(render_args)) => {
            let params_path = &render_args.params.params_path;
            let mut fractal_params = read_fractal_params(params_path)?;
            if let Some(workers) = render_args.workers {
                match &mut fractal_params {
                    FractalParams::Mandelbrot(inner_params) => {
                        inner_params.render_options.worker_count = workers;
                    }
                }
            }

            let directory_path = build_output_path_with_date_time(
                params_path,
                "render",
                &maybe_date_time_string(render_args.params.date_time_out),
            )?;
            render_fractal(&fractal_params, directory_path)
                .with_context(|| format!("Render failed for: {}", params_path))?;
        }

        Some(CommandsEnum::Swatch(params)) => {
            let FractalParams::Mandelbrot(inner_params) =
                read_fractal_params(&params.params_path)?;
            let directory_path = build_output_path_with_date_time(
                &params.params_path,
                "swatch",
                &maybe_date_time_string(params.date_time_out),
            )?;
            generate_color_swatch(&inner_params, directory_path)?;
        }

        None => {
            println!("Default command (nothing specified!)");
        }
    }
    Ok(())
}
