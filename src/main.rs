use clap::{Parser, Subcommand};
use image_file_resizer::config::{self, ConfigError, ResizerConfig};
use image_file_resizer::imaging::{CompressFormat, Rotation};
use image_file_resizer::loader::InputFile;
use image_file_resizer::output;
use image_file_resizer::pipeline::{OutputArtifact, OutputType, Resizer};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "image-file-resizer")]
#[command(about = "Resize, rotate and re-encode image files")]
#[command(long_about = "\
Resize, rotate and re-encode image files

The image is scaled to fit the constraint box while keeping its aspect ratio,
rotated by a quarter turn if asked, and encoded as JPEG, PNG or WebP.

Sizing rules:
  Too wide    → scaled down to max-width
  Too narrow  → scaled up to min-width
  Too tall    → scaled down to max-height (wins over the width rules)
  Too short   → scaled up to min-height
  min = max on both axes forces an exact size

Outputs:
  base64  data URI on stdout (or --out)
  blob    raw bytes written to --out
  file    raw bytes written under a derived name (photo.png → photo.webp)

Settings are read from config.toml when present; flags override it.
Run 'image-file-resizer gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize one image file
    Resize(ResizeArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Image to resize
    file: PathBuf,

    /// Maximum output width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum output height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Minimum output width in pixels (0 = unset)
    #[arg(long)]
    min_width: Option<u32>,

    /// Minimum output height in pixels (0 = unset)
    #[arg(long)]
    min_height: Option<u32>,

    /// Output format: jpeg, png or webp
    #[arg(long)]
    format: Option<CompressFormat>,

    /// Encoding quality, 0-100 (lossy formats only)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Clockwise rotation: 0, 90, 180 or 270
    #[arg(long)]
    rotation: Option<Rotation>,

    /// Output representation: base64, blob or file
    #[arg(long)]
    output_type: Option<OutputType>,

    /// Destination: a path for base64/blob, a directory for file
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Resize(args) => {
            let config = apply_overrides(config::load_config(&cli.config)?, &args)?;
            let request = config.to_request();
            if request.output_type == OutputType::Blob && args.out.is_none() {
                return Err("blob output needs a destination: pass --out <PATH>".into());
            }

            let file = InputFile::from_path(&args.file);
            let source_name = file.name.clone();
            let resizer = Resizer::new();
            let artifact = resizer.resize(Some(file), request)?.await?;

            let destination = write_artifact(&artifact, args.out.as_deref())?;
            output::print_artifact(&source_name, &artifact, destination.as_deref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries nothing but the data URI.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Layer command-line flags over the loaded config and re-validate.
fn apply_overrides(
    mut config: ResizerConfig,
    args: &ResizeArgs,
) -> Result<ResizerConfig, ConfigError> {
    let constraints = &mut config.constraints;
    if let Some(w) = args.max_width {
        constraints.max_width = w;
    }
    if let Some(h) = args.max_height {
        constraints.max_height = h;
    }
    if let Some(w) = args.min_width {
        constraints.min_width = Some(w);
    }
    if let Some(h) = args.min_height {
        constraints.min_height = Some(h);
    }

    let encoding = &mut config.encoding;
    if let Some(format) = args.format {
        encoding.format = format;
    }
    if let Some(quality) = args.quality {
        encoding.quality = quality;
    }
    if let Some(rotation) = args.rotation {
        encoding.rotation = rotation;
    }

    if let Some(output_type) = args.output_type {
        config.output.output_type = output_type;
    }

    config.validate()?;
    Ok(config)
}

/// Write the artifact where it belongs and return the path, `None` for stdout.
fn write_artifact(
    artifact: &OutputArtifact,
    out: Option<&Path>,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    match artifact {
        OutputArtifact::Base64(data_url) => match out {
            Some(path) => {
                std::fs::write(path, data_url)?;
                Ok(Some(path.to_path_buf()))
            }
            None => {
                println!("{data_url}");
                Ok(None)
            }
        },
        OutputArtifact::Blob(blob) => {
            let path = out.ok_or("blob output needs a destination: pass --out <PATH>")?;
            std::fs::write(path, &blob.data)?;
            Ok(Some(path.to_path_buf()))
        }
        OutputArtifact::File(file) => {
            let dir = out.unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)?;
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.data)?;
            Ok(Some(path))
        }
    }
}
