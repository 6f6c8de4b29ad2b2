#[cfg(test)]
mod tests {
    use fractal_print::fractals::common::FractalParams;
    use glob::glob;
    use std::fs;

    fn parse_all_parameter_files_or_panic(pattern: &str) -> Vec<FractalParams> {
        let mut parsed = Vec::new();

        // For each match, ensure that we can (1) open the file and (2) parse it into the parameter type.
        for entry in glob(pattern).expect("Failed to read glob pattern") {
            match entry {
                Ok(path) => {
                    let content = fs::read_to_string(&path)
                        .unwrap_or_else(|_| panic!("Failed to read file: {:?}", path));

                    match serde_json::from_str::<FractalParams>(&content) {
                        Ok(params) => parsed.push(params),
                        Err(err) => {
                            panic!("Failed to parse JSON file: {:?}.\n\n{:?}\n", path, err);
                        }
                    }
                }
                Err(e) => panic!("Failed to read path: {:?}. Check permissions.", e),
            }
        }
        parsed
    }

    #[test]
    fn test_ensure_all_demo_files_can_be_parsed_and_validated() {
        let parsed = parse_all_parameter_files_or_panic("demos/**/*.json");
        assert!(!parsed.is_empty());
        for params in parsed.iter() {
            match params {
                FractalParams::Mandelbrot(inner_params) => {
                    inner_params.validate().unwrap();
                }
            }
        }
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let content = fs::read_to_string("demos/mandelbrot/preview_png.json").unwrap();
        let FractalParams::Mandelbrot(params) =
            serde_json::from_str::<FractalParams>(&content).unwrap();

        assert_eq!(params.color_map.palette_trim_count, 38);
        assert_eq!(
            params.color_map.hue_ramp,
            fractal_print::core::color_map::HueRamp::hsv()
        );
        assert_eq!(params.render_options.progress_tick_count, 100);
        assert!(params.render_options.worker_count > 0);
        assert_eq!(
            params.print_specification.file_name(),
            "image-mandelbrot-9x6-72dpi.png"
        );
    }

    #[test]
    fn test_print_job_resolution() {
        let content = fs::read_to_string("demos/mandelbrot/print_36x24_pdf.json").unwrap();
        let FractalParams::Mandelbrot(params) =
            serde_json::from_str::<FractalParams>(&content).unwrap();

        assert_eq!(params.resolution(), nalgebra::Vector2::new(10800, 7200));
        assert_eq!(
            params.print_specification.file_name(),
            "image-mandelbrot-36x24-300dpi.pdf"
        );
    }

    #[test]
    fn test_unknown_file_format_is_rejected() {
        let content = fs::read_to_string("tests/param_files/mandelbrot_tiny.json")
            .unwrap()
            .replace("\"png\"", "\"tiff\"");
        assert!(serde_json::from_str::<FractalParams>(&content).is_err());
    }
}
