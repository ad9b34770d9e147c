// Runner for the `pizza_cutter` library: load a photo, find the cuts, save the
// annotated copy. All of the actual work lives in the library.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::error;

use pizza_cutter::core_modules::utils::image_helper::image_helper::{load_rgb, save_png};
use pizza_cutter::{
    ClassificationMode, ClassifierConfig, CutConfig, CutError, ParallelPipeline, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "pizza_cutter", about = "Find the pizza cuts that slice the fewest toppings")]
struct Cli {
    /// Input image path (PNG, JPEG, BMP)
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG with the cut lines drawn on the input
    #[arg(short, long)]
    output: PathBuf,

    /// Number of diametric cuts
    #[arg(short, long, default_value = "4")]
    cuts: u32,

    /// Color levels kept per channel before classification (1-255)
    #[arg(short = 'l', long, default_value = "8")]
    color_levels: u32,

    /// Also save the classified regions as a PNG
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Classify by hue and saturation instead of RGB distance
    #[arg(long)]
    hsv: bool,

    /// Worker tasks (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,
}

async fn run(cli: Cli) -> Result<(), CutError> {
    let defaults = PipelineConfig::default();
    let config = PipelineConfig {
        color_levels: cli.color_levels,
        classifier: ClassifierConfig {
            mode: if cli.hsv {
                ClassificationMode::Hsv
            } else {
                ClassificationMode::Rgb
            },
            ..ClassifierConfig::default()
        },
        cut: CutConfig {
            cuts: cli.cuts,
            ..CutConfig::default()
        },
        workers: cli.workers.unwrap_or(defaults.workers),
    };
    let pipeline = ParallelPipeline::new(config)?;

    let image = Arc::new(load_rgb(&cli.input)?);
    let report = pipeline.run(image).await?;

    save_png(&cli.output, &report.overlay)?;
    if let Some(path) = &cli.regions {
        save_png(path, &pipeline.pipeline().paint_regions(&report.grid))?;
    }

    let solution = report.solution;
    println!(
        "angle {} deg, center ({}, {}), radius {}, toppings crossed {}",
        solution.angle_offset, solution.centroid.x, solution.centroid.y, solution.radius, solution.hits
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
