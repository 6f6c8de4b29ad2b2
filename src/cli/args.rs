use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct FractalPrintArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Render the image described by a parameter file.
    Render(RenderArgs),
    /// Write a strip showing the escape-depth palette of a parameter file.
    Swatch(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    #[clap(long, short)]
    pub date_time_out: bool,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub params: ParameterFilePath,

    /// Overrides `render_options.worker_count` from the parameter file.
    #[clap(long, short)]
    pub workers: Option<usize>,
}
