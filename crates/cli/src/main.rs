use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use truemood_core::classification::domain::emotion::Emotion;
use truemood_core::pipeline::annotate_frames_use_case::{AnnotateFramesUseCase, RunSummary};
use truemood_core::pipeline::pipeline_logger::LogPipelineLogger;
use truemood_core::pipeline::session::PipelineSession;
use truemood_core::shared::config::PipelineConfig;
use truemood_core::video::domain::frame_sink::FrameSink;
use truemood_core::video::infrastructure::image_file_writer::ImageFileWriter;
use truemood_core::video::infrastructure::image_sequence_reader::{
    is_image_file, ImageSequenceReader,
};

/// Face emotion recognition for images and image sequences.
#[derive(Parser, Debug)]
#[command(name = "truemood")]
struct Cli {
    /// Input image, or a directory of images processed in name order.
    input: PathBuf,

    /// Output image (for an image input) or directory (for a directory input).
    output: PathBuf,

    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ONNX emotion model.
    #[arg(long)]
    model: Option<PathBuf>,

    /// SeetaFace cascade model.
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// Directory with bundled assets (cascade and model).
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// TrueType/OpenType font for labels; without it only boxes are drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Side length of the square classifier input.
    #[arg(long)]
    input_size: Option<u32>,

    /// Mirror frames horizontally before processing.
    #[arg(long)]
    mirror: bool,

    /// Fail instead of passing frames through when a model cannot be loaded.
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let pipeline = PipelineSession::load(&config)?;

    let sink: Box<dyn FrameSink> = if cli.input.is_dir() {
        Box::new(ImageFileWriter::to_directory(&cli.output))
    } else {
        Box::new(ImageFileWriter::to_file(&cli.output))
    };
    let mut use_case = AnnotateFramesUseCase::new(
        Box::new(ImageSequenceReader::new()),
        sink,
        pipeline,
        Box::new(LogPipelineLogger::default()),
        config.mirror,
    );
    let summary = use_case.execute(&cli.input)?;

    log::info!("Output written to {}", cli.output.display());
    println!("{}", format_summary(&summary));
    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model_path = Some(model.clone());
    }
    if let Some(cascade) = &cli.cascade {
        config.cascade_path = Some(cascade.clone());
    }
    if let Some(dir) = &cli.assets_dir {
        config.assets_dir = Some(dir.clone());
    }
    if let Some(font) = &cli.font {
        config.font_path = Some(font.clone());
    }
    if let Some(size) = cli.input_size {
        config.input_size = size;
    }
    config.mirror |= cli.mirror;
    config.strict |= cli.strict;
    config.validate()?;
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if cli.input.is_file() && !is_image_file(&cli.input) {
        return Err(format!("Unsupported input image: {}", cli.input.display()).into());
    }
    if cli.input.is_file() && !is_image_file(&cli.output) {
        return Err(format!(
            "Output must be an image file for an image input, got {}",
            cli.output.display()
        )
        .into());
    }
    if cli.input.is_dir() && cli.output.is_file() {
        return Err(format!(
            "Output must be a directory for a directory input, got {}",
            cli.output.display()
        )
        .into());
    }
    if same_path(&cli.input, &cli.output) {
        return Err("Input and output must differ".into());
    }
    Ok(())
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn format_summary(summary: &RunSummary) -> String {
    let mut line = format!(
        "{} frame(s), {} face(s) labelled",
        summary.frames, summary.faces
    );
    let counts: Vec<String> = Emotion::ALL
        .iter()
        .filter(|&&e| summary.count(e) > 0)
        .map(|&e| format!("{e}: {}", summary.count(e)))
        .collect();
    if !counts.is_empty() {
        line.push_str(&format!(" ({})", counts.join(", ")));
    }
    if summary.skipped_faces > 0 {
        line.push_str(&format!(", {} skipped", summary.skipped_faces));
    }
    if summary.unreadable_frames > 0 {
        line.push_str(&format!(", {} unreadable", summary.unreadable_frames));
    }
    line
}
